pub mod stage1_resolve;
pub mod stage2_redistribute;
pub mod stage3_normalize;
pub mod stage4_combine;
pub mod stage5_rank;
pub mod stage6_report;
