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

//! Shard-local data plane: set representations, the per-shard key
//! dictionary, and the set operations that run inside shard callbacks.

pub mod db_slice;
pub mod flat_set;
pub mod intset;
pub mod op_status;
pub mod set_ops;
pub mod set_value;
pub mod util;

pub use db_slice::{DataType, DbSlice, Object};
pub use flat_set::FlatSet;
pub use intset::IntSet;
pub use op_status::{OpResult, OpStatus};
pub use set_ops::{OpArgs, op_add, op_diff, op_inter, op_pop, op_rem, op_union};
pub use set_value::{SetEncoding, SetValue};
