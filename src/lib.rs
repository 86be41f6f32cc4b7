//! Brigade Activity Dashboard - 学生每日活动面板后端服务
//!
//! 基于 Actix Web 构建，活动与提交数据来自外部 REST API。
//!
//! # 架构
//! - `client`: 上游 API 客户端（reqwest / 内存）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 时钟与运行时生命周期管理
//! - `schedule`: 阶段、状态与提交窗口判定
//! - `services`: 业务逻辑层
//! - `utils`: 工具函数

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod schedule;
pub mod services;
pub mod utils;
