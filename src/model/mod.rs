// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workflow data model.
//!
//! A workflow is a trigger plus an ordered list of uniquely identified steps. Both the diagram
//! and the panel are rendered from it.

pub mod fixtures;
pub mod ids;
pub mod workflow;

pub use ids::{Id, IdError, StepId};
pub use workflow::{Workflow, WorkflowError, WorkflowStep, RESERVED_STEP_IDS};
