/// Construction and application of gate matrices on a state vector.
pub mod matrix_ops;
/// Born rule sampling and state collapse.
pub mod measurement_ops;
