// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod async_sources_tests;
pub mod cancellation_token_tests;
pub mod into_stream_tests;
pub mod rivulet_task_tests;
