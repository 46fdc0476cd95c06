// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! flowlink: a terminal workflow viewer.
//!
//! The left pane shows a workflow as a box diagram, the right pane shows its JSON configuration.
//! Clicking a step box scrolls the panel to that step's entry and highlights it briefly
//! (see [`sync`]).

pub mod config;
pub mod format;
pub mod layout;
pub mod model;
pub mod render;
pub mod sync;
pub mod tui;
