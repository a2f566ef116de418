use crate::error::ConfigError;

/// Fixed-capacity rolling window of recent energy values.
///
/// Always holds exactly `capacity` entries: it starts pre-filled with zeros
/// and every push overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct EnergyHistory {
    values: Box<[f64]>,
    /// Slot the next push will overwrite (the oldest entry)
    cursor: usize,
}

impl EnergyHistory {
    /// Create a zero-filled history; fails for a zero capacity
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "dynamics.history_capacity".to_string(),
                value: capacity.to_string(),
            });
        }

        Ok(Self {
            values: vec![0.0; capacity].into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Append a value, evicting the oldest one
    pub fn push(&mut self, value: f64) {
        self.values[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.values.len();
    }

    /// Most recently pushed value (0.0 before any push)
    pub fn latest(&self) -> f64 {
        let last = (self.cursor + self.values.len() - 1) % self.values.len();
        self.values[last]
    }

    /// Arithmetic mean over the whole window, summed oldest first
    pub fn mean(&self) -> f64 {
        self.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Entries in chronological order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.values.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Back to the all-zero initial state
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
        self.cursor = 0;
    }
}
