//! Named benchmark times: qualifying standards and records

/// Composite key shared by events, time standards and records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub gender: String,
    pub ind_rel: String,
    pub distance: i64,
    pub stroke: String,
    pub low_age: i64,
    pub high_age: i64,
}

/// One named threshold time for one event key
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    /// `tag_name`, e.g. `Sectionals` or `Pool Record`
    pub name: String,
    pub key: EventKey,
    pub time: f64,
}

/// All benchmarks of one kind, in table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkSet {
    items: Vec<Benchmark>,
}

impl BenchmarkSet {
    pub fn new(items: Vec<Benchmark>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Benchmarks carrying exactly this name
    pub fn named(&self, name: &str) -> Vec<&Benchmark> {
        self.items.iter().filter(|b| b.name == name).collect()
    }

    /// Distinct names, first-seen order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for b in &self.items {
            if !names.contains(&b.name.as_str()) {
                names.push(&b.name);
            }
        }
        names
    }
}
