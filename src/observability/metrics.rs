use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub donation_matches_total: IntCounterVec,
    pub donations_in_queue: IntGauge,
    pub match_latency_seconds: HistogramVec,
    pub ngo_capacity_remaining_kg: GaugeVec,
    pub recommendations_total: IntCounter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let donation_matches_total = IntCounterVec::new(
            Opts::new("donation_matches_total", "Donation matching attempts by outcome"),
            &["outcome"],
        )
        .expect("valid donation_matches_total metric");

        let donations_in_queue =
            IntGauge::new("donations_in_queue", "Donations waiting to be matched")
                .expect("valid donations_in_queue metric");

        let match_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "match_latency_seconds",
                "Latency of donation matching in seconds",
            ),
            &["outcome"],
        )
        .expect("valid match_latency_seconds metric");

        let ngo_capacity_remaining_kg = GaugeVec::new(
            Opts::new(
                "ngo_capacity_remaining_kg",
                "Capacity left at an NGO after its last assignment",
            ),
            &["ngo_id"],
        )
        .expect("valid ngo_capacity_remaining_kg metric");

        let recommendations_total = IntCounter::new(
            "recommendations_total",
            "Recommendation lists computed",
        )
        .expect("valid recommendations_total metric");

        registry
            .register(Box::new(donation_matches_total.clone()))
            .expect("register donation_matches_total");
        registry
            .register(Box::new(donations_in_queue.clone()))
            .expect("register donations_in_queue");
        registry
            .register(Box::new(match_latency_seconds.clone()))
            .expect("register match_latency_seconds");
        registry
            .register(Box::new(ngo_capacity_remaining_kg.clone()))
            .expect("register ngo_capacity_remaining_kg");
        registry
            .register(Box::new(recommendations_total.clone()))
            .expect("register recommendations_total");

        Self {
            registry,
            donation_matches_total,
            donations_in_queue,
            match_latency_seconds,
            ngo_capacity_remaining_kg,
            recommendations_total,
        }
    }

    pub fn observe_match(&self, outcome: &str, elapsed_seconds: f64) {
        self.match_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
        self.donation_matches_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
