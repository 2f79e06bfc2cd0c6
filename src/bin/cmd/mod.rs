// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod convert;
mod inspect;

pub use convert::ConvertCmd;
pub use inspect::InspectCmd;
