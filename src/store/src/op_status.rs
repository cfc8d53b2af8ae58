// Copyright (c) 2024-present, arana-db Community.  All rights reserved.
//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use snafu::Snafu;

/// Value-or-status return used by every shard-local operation.
pub type OpResult<T> = Result<T, OpStatus>;

/// Status taxonomy shared by shard ops, combiners and command handlers.
///
/// `KeyNotFound` is benign for reads and combiners; `Skipped` never leaves
/// the combiner layer.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    #[snafu(display("key not found"))]
    KeyNotFound,

    #[snafu(display("wrong object type"))]
    WrongType,

    #[snafu(display("value is not an integer or out of range"))]
    InvalidInt,

    /// This shard contributed nothing by design.
    #[snafu(display("skipped"))]
    Skipped,

    #[snafu(display("unexpected status"))]
    Unexpected,
}
