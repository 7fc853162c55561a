// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Named PSM global interrupt lines, one per serviced interrupt group.

pub const REQ_PWRUP0: u32 = 0;
pub const REQ_PWRUP1: u32 = 1;
pub const REQ_PWRDWN0: u32 = 2;
pub const REQ_PWRDWN1: u32 = 3;
pub const WAKEUP0: u32 = 4;
pub const WAKEUP1: u32 = 5;
pub const PWR_CTRL1: u32 = 6;
