//! Named-instrument registry on top of a private Prometheus `Registry`.
//!
//! Instruments are looked up by name and every observation or increment
//! must supply exactly the label names the instrument was declared with.
//! A mismatch is a caller bug and is reported as an error, never dropped.
//!
//! Each `MetricsRegistry` owns its own Prometheus registry, so several
//! instances (one per router, one per test) can coexist in a process.

use prometheus::core::Collector;
use prometheus::{CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Instant;
use thiserror::Error;

/// Errors raised by [`MetricsRegistry`].
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("an instrument named `{0}` is already registered")]
    DuplicateName(String),

    #[error("no instrument named `{0}` is registered")]
    UnknownInstrument(String),

    #[error("instrument `{name}` is not a {expected}")]
    KindMismatch { name: String, expected: &'static str },

    #[error("instrument `{name}` declares labels {expected:?}, got {got:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("counter `{name}` cannot be incremented by {amount}")]
    NegativeIncrement { name: String, amount: f64 },

    #[error("metrics registry lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Prometheus(#[from] prometheus::Error),

    #[error("exposition output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// What kind of instrument a spec declares.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentKind {
    // ---
    Histogram { buckets: Vec<f64> },
    Counter,
}

/// Declaration of an instrument: name, help text, label names and kind.
#[derive(Debug, Clone)]
pub struct InstrumentSpec {
    // ---
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
    pub kind: InstrumentKind,
}

impl InstrumentSpec {
    // ---
    pub fn histogram(name: &str, help: &str, label_names: &[&str], buckets: Vec<f64>) -> Self {
        // ---
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            kind: InstrumentKind::Histogram { buckets },
        }
    }

    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        // ---
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            kind: InstrumentKind::Counter,
        }
    }
}

enum Instrument {
    Histogram(HistogramVec),
    Counter(CounterVec),
}

struct Entry {
    instrument: Instrument,
    label_names: Vec<String>,
}

impl Entry {
    /// Orders `labels` by the declared label names.
    ///
    /// Fails unless `labels` names every declared label exactly once and
    /// nothing else.
    fn label_values<'a>(
        &self,
        name: &str,
        labels: &[(&str, &'a str)],
    ) -> Result<Vec<&'a str>, MetricsError> {
        // ---
        let mismatch = || MetricsError::LabelMismatch {
            name: name.to_string(),
            expected: self.label_names.clone(),
            got: labels.iter().map(|(k, _)| k.to_string()).collect(),
        };

        if labels.len() != self.label_names.len() {
            return Err(mismatch());
        }

        self.label_names
            .iter()
            .map(|declared| {
                let mut matches = labels.iter().filter(|(k, _)| *k == declared.as_str());
                match (matches.next(), matches.next()) {
                    (Some((_, value)), None) => Ok(*value),
                    _ => Err(mismatch()),
                }
            })
            .collect()
    }
}

/// Process-wide set of instruments plus default process gauges.
pub struct MetricsRegistry {
    // ---
    registry: Registry,
    /// Names owned by the built-in process gauges.
    reserved: HashSet<String>,
    instruments: RwLock<HashMap<String, Entry>>,
    started: Instant,
    uptime: Gauge,
}

impl MetricsRegistry {
    // ---
    /// Creates a registry pre-populated with process-level gauges.
    ///
    /// On Linux this includes `process_cpu_seconds_total`,
    /// `process_resident_memory_bytes` and friends. `process_uptime_seconds`
    /// is available everywhere and refreshed on each render.
    pub fn new() -> Result<Self, MetricsError> {
        // ---
        let registry = Registry::new();
        let mut reserved = HashSet::new();
        let mut builtin = |collector: Box<dyn Collector>| -> Result<(), MetricsError> {
            reserved.extend(collector.desc().iter().map(|d| d.fq_name.clone()));
            registry.register(collector)?;
            Ok(())
        };

        #[cfg(target_os = "linux")]
        builtin(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let uptime = Gauge::new(
            "process_uptime_seconds",
            "Seconds since the process started serving metrics",
        )?;
        builtin(Box::new(uptime.clone()))?;

        Ok(Self {
            registry,
            reserved,
            instruments: RwLock::new(HashMap::new()),
            started: Instant::now(),
            uptime,
        })
    }

    /// Adds an instrument.
    ///
    /// # Errors
    /// [`MetricsError::DuplicateName`] if the name is already taken, either by
    /// another instrument or by a built-in process gauge.
    pub fn register(&self, spec: InstrumentSpec) -> Result<(), MetricsError> {
        // ---
        let mut instruments = self.instruments.write().map_err(|_| MetricsError::Poisoned)?;
        if instruments.contains_key(&spec.name) || self.reserved.contains(&spec.name) {
            return Err(MetricsError::DuplicateName(spec.name));
        }

        let labels: Vec<&str> = spec.label_names.iter().map(String::as_str).collect();
        let (instrument, collector): (Instrument, Box<dyn Collector>) =
            match spec.kind {
                InstrumentKind::Histogram { buckets } => {
                    let vec = HistogramVec::new(
                        HistogramOpts::new(&spec.name, &spec.help).buckets(buckets),
                        &labels,
                    )?;
                    (Instrument::Histogram(vec.clone()), Box::new(vec) as Box<dyn Collector>)
                }
                InstrumentKind::Counter => {
                    let vec = CounterVec::new(Opts::new(&spec.name, &spec.help), &labels)?;
                    (Instrument::Counter(vec.clone()), Box::new(vec) as Box<dyn Collector>)
                }
            };

        match self.registry.register(collector) {
            Ok(()) => {}
            Err(prometheus::Error::AlreadyReg) => {
                return Err(MetricsError::DuplicateName(spec.name));
            }
            Err(err) => return Err(err.into()),
        }

        tracing::debug!(name = %spec.name, "instrument registered");
        instruments.insert(
            spec.name,
            Entry {
                instrument,
                label_names: spec.label_names,
            },
        );
        Ok(())
    }

    /// Records `value` into the named histogram under the given label tuple.
    ///
    /// The first observation for a label tuple creates its time series.
    pub fn observe(
        &self,
        name: &str,
        labels: &[(&str, &str)],
        value: f64,
    ) -> Result<(), MetricsError> {
        // ---
        let instruments = self.instruments.read().map_err(|_| MetricsError::Poisoned)?;
        let entry = instruments
            .get(name)
            .ok_or_else(|| MetricsError::UnknownInstrument(name.to_string()))?;

        let Instrument::Histogram(vec) = &entry.instrument else {
            return Err(MetricsError::KindMismatch {
                name: name.to_string(),
                expected: "histogram",
            });
        };

        let values = entry.label_values(name, labels)?;
        vec.get_metric_with_label_values(&values)?.observe(value);
        Ok(())
    }

    /// Adds `amount` to the named counter under the given label tuple.
    ///
    /// # Errors
    /// [`MetricsError::NegativeIncrement`] if `amount` is negative or NaN.
    pub fn increment(
        &self,
        name: &str,
        labels: &[(&str, &str)],
        amount: f64,
    ) -> Result<(), MetricsError> {
        // ---
        if amount.is_nan() || amount < 0.0 {
            return Err(MetricsError::NegativeIncrement {
                name: name.to_string(),
                amount,
            });
        }

        let instruments = self.instruments.read().map_err(|_| MetricsError::Poisoned)?;
        let entry = instruments
            .get(name)
            .ok_or_else(|| MetricsError::UnknownInstrument(name.to_string()))?;

        let Instrument::Counter(vec) = &entry.instrument else {
            return Err(MetricsError::KindMismatch {
                name: name.to_string(),
                expected: "counter",
            });
        };

        let values = entry.label_values(name, labels)?;
        vec.get_metric_with_label_values(&values)?.inc_by(amount);
        Ok(())
    }

    /// Renders every instrument in the Prometheus text exposition format.
    ///
    /// Families are sorted by name and series by label values.
    pub fn render(&self) -> Result<String, MetricsError> {
        // ---
        self.uptime.set(self.started.elapsed().as_secs_f64());

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn registry_with_defaults() -> MetricsRegistry {
        // ---
        let registry = MetricsRegistry::new().unwrap();
        registry
            .register(InstrumentSpec::histogram(
                "latency_ms",
                "test latency",
                &["method", "route"],
                vec![1.0, 10.0, 100.0],
            ))
            .unwrap();
        registry
            .register(InstrumentSpec::counter("ops_total", "test ops", &["operation"]))
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_name_is_rejected() {
        // ---
        let registry = registry_with_defaults();

        let err = registry
            .register(InstrumentSpec::counter("ops_total", "again", &["operation"]))
            .unwrap_err();
        assert!(matches!(err, MetricsError::DuplicateName(name) if name == "ops_total"));

        // Different kind, same name.
        let err = registry
            .register(InstrumentSpec::histogram("ops_total", "again", &[], vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, MetricsError::DuplicateName(_)));
    }

    #[test]
    fn builtin_gauge_names_are_taken() {
        // ---
        let registry = MetricsRegistry::new().unwrap();
        let err = registry
            .register(InstrumentSpec::counter("process_uptime_seconds", "clash", &[]))
            .unwrap_err();
        assert!(matches!(err, MetricsError::DuplicateName(_)));
    }

    #[test]
    fn observe_creates_series_per_label_tuple() {
        // ---
        let registry = registry_with_defaults();

        registry
            .observe("latency_ms", &[("method", "GET"), ("route", "/a")], 3.0)
            .unwrap();
        // Label order in the call does not matter.
        registry
            .observe("latency_ms", &[("route", "/a"), ("method", "GET")], 30.0)
            .unwrap();
        registry
            .observe("latency_ms", &[("method", "POST"), ("route", "/a")], 300.0)
            .unwrap();

        let text = registry.render().unwrap();
        assert!(text.contains("# TYPE latency_ms histogram"));
        assert!(text.contains(r#"latency_ms_count{method="GET",route="/a"} 2"#));
        assert!(text.contains(r#"latency_ms_count{method="POST",route="/a"} 1"#));
        assert!(text.contains(r#"latency_ms_bucket{method="GET",route="/a",le="10"} 1"#));
    }

    #[test]
    fn mismatched_labels_are_errors() {
        // ---
        let registry = registry_with_defaults();

        let missing = registry.observe("latency_ms", &[("method", "GET")], 1.0);
        assert!(matches!(missing, Err(MetricsError::LabelMismatch { .. })));

        let extra = registry.increment(
            "ops_total",
            &[("operation", "create"), ("route", "/a")],
            1.0,
        );
        assert!(matches!(extra, Err(MetricsError::LabelMismatch { .. })));

        let wrong = registry.increment("ops_total", &[("op", "create")], 1.0);
        assert!(matches!(wrong, Err(MetricsError::LabelMismatch { .. })));

        let repeated = registry.observe(
            "latency_ms",
            &[("method", "GET"), ("method", "POST")],
            1.0,
        );
        assert!(matches!(repeated, Err(MetricsError::LabelMismatch { .. })));
    }

    #[test]
    fn unknown_and_wrong_kind_are_errors() {
        // ---
        let registry = registry_with_defaults();

        let unknown = registry.increment("nope_total", &[], 1.0);
        assert!(matches!(unknown, Err(MetricsError::UnknownInstrument(_))));

        let wrong_kind = registry.observe("ops_total", &[("operation", "create")], 1.0);
        assert!(matches!(
            wrong_kind,
            Err(MetricsError::KindMismatch { expected: "histogram", .. })
        ));
    }

    #[test]
    fn increment_adds_amount_and_rejects_negative() {
        // ---
        let registry = registry_with_defaults();

        registry
            .increment("ops_total", &[("operation", "create")], 1.0)
            .unwrap();
        registry
            .increment("ops_total", &[("operation", "create")], 2.0)
            .unwrap();
        registry
            .increment("ops_total", &[("operation", "create")], 0.0)
            .unwrap();

        let negative = registry.increment("ops_total", &[("operation", "create")], -1.0);
        assert!(matches!(negative, Err(MetricsError::NegativeIncrement { .. })));

        let text = registry.render().unwrap();
        assert!(text.contains(r#"ops_total{operation="create"} 3"#));
    }

    #[test]
    fn render_includes_help_type_and_uptime() {
        // ---
        let registry = registry_with_defaults();
        let text = registry.render().unwrap();

        assert!(text.contains("# HELP process_uptime_seconds"));
        assert!(text.contains("# TYPE process_uptime_seconds gauge"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn render_includes_process_gauges() {
        // ---
        let registry = MetricsRegistry::new().unwrap();
        let text = registry.render().unwrap();

        assert!(text.contains("process_cpu_seconds_total"));
        assert!(text.contains("process_resident_memory_bytes"));
    }

    #[test]
    fn registries_are_independent() {
        // ---
        let first = registry_with_defaults();
        let second = registry_with_defaults();

        first
            .increment("ops_total", &[("operation", "create")], 1.0)
            .unwrap();

        assert!(first.render().unwrap().contains(r#"ops_total{operation="create"} 1"#));
        assert!(!second.render().unwrap().contains(r#"operation="create""#));
    }
}
