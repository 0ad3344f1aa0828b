// Report generation: current wizard data → estimator → persisted report.

pub mod handlers;
