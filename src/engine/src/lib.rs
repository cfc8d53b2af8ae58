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

//! Thread-per-shard execution engine.
//!
//! Each shard owns its dictionaries and runs transaction callbacks to
//! completion on its own thread. The transaction layer serializes writers
//! through per-shard queues whose order is globally consistent, so a
//! multi-hop transaction sees no interleaving between its hops.

pub mod error;
pub mod shard;
pub mod shard_set;
pub mod transaction;

pub use error::{Error, Result};
pub use shard::{EngineShard, ShardId};
pub use shard_set::ShardSet;
pub use transaction::{Transaction, TxContext, no_op_cb};
