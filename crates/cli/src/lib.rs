// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conformance harness for an LLM assistant that turns plain text into RTF.
//!
//! The harness sends fixture prompts to a remote assistant (OpenAI
//! Assistants or Chat Completions), checks each reply with [`rtf_check`],
//! records per-case outcomes and renders a Markdown or JUnit report.
//!
//! The remote client takes an explicit [`config::ClientConfig`]; only the
//! [`env`] module reads the process environment.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod console;
pub mod env;
pub mod fixtures;
pub mod report;
pub mod suite;
pub mod time;
