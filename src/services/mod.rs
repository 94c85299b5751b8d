// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod password;
pub mod sync;

pub use account::{AccountService, NewAccount, Session};
pub use sync::{ChangeBus, ChangeEvent};
