use crate::core::Time;

pub fn samples_ms(values: &[i64]) -> Vec<Time> {
    values.iter().copied().map(Time::from_millis).collect()
}
