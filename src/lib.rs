// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod bulk;
pub mod chat;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod health;
pub mod logging;
pub mod models;
pub mod money;
pub mod records;
pub mod stats;
pub mod status;
pub mod utils;
