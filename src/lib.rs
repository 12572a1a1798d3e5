// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod projector;
pub mod sync;
pub mod table;
pub mod utils;
pub mod validate;
