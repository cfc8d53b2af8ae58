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

//! General hash set of byte-string members.
//!
//! Iteration order is unspecified but does not change between reads as long
//! as the set is not mutated, which is what the pop-head loop relies on.

use std::collections::HashSet;

use bytes::Bytes;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlatSet {
    members: HashSet<Bytes>,
}

impl FlatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, v: &[u8]) -> bool {
        self.members.contains(v)
    }

    /// Copying insert; returns false when `v` is already a member.
    pub fn add(&mut self, v: &[u8]) -> bool {
        if self.members.contains(v) {
            return false;
        }
        self.members.insert(Bytes::copy_from_slice(v))
    }

    /// Insert an already-owned member without copying.
    pub fn insert(&mut self, v: Bytes) -> bool {
        self.members.insert(v)
    }

    pub fn remove(&mut self, v: &[u8]) -> bool {
        self.members.remove(v)
    }

    /// Externalize and erase the iteration head.
    pub fn take_first(&mut self) -> Option<Bytes> {
        let first = self.members.iter().next().cloned()?;
        self.members.remove(&first);
        Some(first)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        self.members.iter()
    }
}
