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

//! Tagged set container with the adaptive encoding policy.
//!
//! A set starts as an intset when every member is a canonical integer and
//! upgrades to the flat representation the first time a member fails to
//! parse or the configured cardinality ceiling is crossed. Upgrades never
//! reverse for the lifetime of the key.

use bytes::Bytes;

use crate::flat_set::FlatSet;
use crate::intset::IntSet;
use crate::util::{format_int, parse_int};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetEncoding {
    IntSet,
    FlatSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    IntSet(IntSet),
    FlatSet(FlatSet),
}

impl SetValue {
    pub fn new(encoding: SetEncoding) -> Self {
        match encoding {
            SetEncoding::IntSet => SetValue::IntSet(IntSet::new()),
            SetEncoding::FlatSet => SetValue::FlatSet(FlatSet::new()),
        }
    }

    /// Initial encoding for a fresh set holding `vals`.
    pub fn pick_encoding(vals: &[Bytes]) -> SetEncoding {
        if vals.iter().all(|v| parse_int(v).is_some()) {
            SetEncoding::IntSet
        } else {
            SetEncoding::FlatSet
        }
    }

    pub fn encoding(&self) -> SetEncoding {
        match self {
            SetValue::IntSet(_) => SetEncoding::IntSet,
            SetValue::FlatSet(_) => SetEncoding::FlatSet,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            SetValue::IntSet(is) => is.len(),
            SetValue::FlatSet(fs) => fs.len(),
        }
    }

    /// Membership test. Under the intset encoding a value that is not a
    /// canonical integer cannot be a member.
    pub fn is_member(&self, v: &[u8]) -> bool {
        match self {
            SetValue::IntSet(is) => parse_int(v).is_some_and(|n| is.contains(n)),
            SetValue::FlatSet(fs) => fs.contains(v),
        }
    }

    /// Insert one member, upgrading the encoding when `v` is not an integer
    /// or the intset would grow past `max_entries`. Returns true when `v`
    /// was newly inserted.
    pub fn add(&mut self, v: &[u8], max_entries: usize) -> bool {
        let upgrade = match self {
            SetValue::IntSet(is) => match parse_int(v) {
                Some(n) => {
                    if is.contains(n) {
                        return false;
                    }
                    if is.len() < max_entries {
                        return is.add(n);
                    }
                    // cardinality ceiling crossed
                    true
                }
                None => true,
            },
            SetValue::FlatSet(_) => false,
        };
        if upgrade {
            self.convert_to_flat();
        }
        match self {
            SetValue::FlatSet(fs) => fs.add(v),
            SetValue::IntSet(_) => false,
        }
    }

    pub fn remove(&mut self, v: &[u8]) -> bool {
        match self {
            // non-integer values silently miss
            SetValue::IntSet(is) => parse_int(v).is_some_and(|n| is.remove(n)),
            SetValue::FlatSet(fs) => fs.remove(v),
        }
    }

    /// Visit every member as an owned byte string. Intset members come out
    /// in ascending numerical order.
    pub fn for_each(&self, mut f: impl FnMut(Bytes)) {
        match self {
            SetValue::IntSet(is) => {
                for n in is.iter() {
                    f(format_int(n));
                }
            }
            SetValue::FlatSet(fs) => {
                for m in fs.iter() {
                    f(m.clone());
                }
            }
        }
    }

    pub fn members(&self) -> Vec<Bytes> {
        let mut out = Vec::with_capacity(self.size());
        self.for_each(|m| out.push(m));
        out
    }

    fn convert_to_flat(&mut self) {
        if let SetValue::IntSet(is) = self {
            let mut fs = FlatSet::new();
            for n in is.iter() {
                fs.insert(format_int(n));
            }
            *self = SetValue::FlatSet(fs);
        }
    }
}
