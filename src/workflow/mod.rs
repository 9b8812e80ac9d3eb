//! 流程层
//!
//! 定义"一轮寻宝"的完整交互流程

pub mod hunt_flow;

pub use hunt_flow::{FlowStep, HuntFlow};
