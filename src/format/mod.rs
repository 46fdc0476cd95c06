// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Export formats.
//!
//! Currently this is Graphviz DOT: a top-to-bottom digraph from the trigger through every step.

pub mod dot;

pub use dot::export_dot;
