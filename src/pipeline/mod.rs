pub mod stage2_benchmarks;
pub mod stage3_score;
pub mod stage4_funnel;
pub mod stage5_distributions;
pub mod stage6_efficiency;
pub mod stage7_report;
