// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram layout.
//!
//! Workflows are linear, so the only layout is a vertical chain of equally wide boxes.

pub mod chain;

pub use chain::{layout_chain, ChainBox, ChainConnector, ChainLayout, ChainSlot};
