// 流媒体目录客户端库
//
// 本库提供电影目录客户端的核心功能，包括：
// - 远端 REST API 访问
// - 目录浏览控制器（筛选/搜索/分页/乐观删除）
// - 会话与订阅门控
// - 客户端表单验证

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod api;
pub mod controller;
pub mod models;
pub mod services;
