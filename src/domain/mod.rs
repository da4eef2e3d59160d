// Domain layer: debts, form state, wire types and the ports the adapters implement.

pub mod form;
pub mod model;
pub mod ports;
