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

use store::{DbSlice, OpArgs};

pub type ShardId = usize;

/// One shard's worth of state, owned exclusively by its thread. Callbacks
/// receive it mutably and must only touch keys routed here.
pub struct EngineShard {
    shard_id: ShardId,
    dbs: Vec<DbSlice>,
    max_intset_entries: usize,
}

impl EngineShard {
    pub(crate) fn new(shard_id: ShardId, databases: usize, max_intset_entries: usize) -> Self {
        Self {
            shard_id,
            dbs: (0..databases).map(|_| DbSlice::new()).collect(),
            max_intset_entries,
        }
    }

    pub fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    pub fn db_slice(&self, db_index: usize) -> &DbSlice {
        &self.dbs[db_index]
    }

    pub fn db_slice_mut(&mut self, db_index: usize) -> &mut DbSlice {
        &mut self.dbs[db_index]
    }

    /// Mutating-op context for one database of this shard.
    pub fn op_args(&mut self, db_index: usize) -> OpArgs<'_> {
        OpArgs {
            db: &mut self.dbs[db_index],
            max_intset_entries: self.max_intset_entries,
        }
    }
}
