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

//! Per-shard key dictionary.
//!
//! Owned exclusively by one shard thread; nothing in here synchronizes.
//! Mutations run inside the `pre_update`/`post_update` bracket so the
//! update epoch stays truthful for outside bookkeeping.

use std::collections::HashMap;

use bytes::Bytes;

use crate::op_status::{OpResult, OpStatus};
use crate::set_value::{SetEncoding, SetValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Set,
}

/// Generic dictionary value. The string variant exists so type mismatches
/// are representable; the set family never creates one itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    String(Bytes),
    Set(SetValue),
}

impl Object {
    pub fn data_type(&self) -> DataType {
        match self {
            Object::String(_) => DataType::String,
            Object::Set(_) => DataType::Set,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            Object::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_set_mut(&mut self) -> Option<&mut SetValue> {
        match self {
            Object::Set(set) => Some(set),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct DbSlice {
    dict: HashMap<Bytes, Object>,
    version: u64,
}

impl DbSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.dict.contains_key(key)
    }

    /// Look up `key`, requiring `dtype`.
    pub fn find(&self, key: &[u8], dtype: DataType) -> OpResult<&Object> {
        match self.dict.get(key) {
            None => Err(OpStatus::KeyNotFound),
            Some(obj) if obj.data_type() != dtype => Err(OpStatus::WrongType),
            Some(obj) => Ok(obj),
        }
    }

    pub fn find_mut(&mut self, key: &[u8], dtype: DataType) -> OpResult<&mut Object> {
        match self.dict.get_mut(key) {
            None => Err(OpStatus::KeyNotFound),
            Some(obj) if obj.data_type() != dtype => Err(OpStatus::WrongType),
            Some(obj) => Ok(obj),
        }
    }

    /// Find `key` or insert a fresh empty set slot for it. The caller
    /// re-initializes the slot when it decides the real encoding.
    pub fn add_or_find(&mut self, key: &[u8]) -> (&mut Object, bool) {
        let inserted = !self.dict.contains_key(key);
        let obj = self
            .dict
            .entry(Bytes::copy_from_slice(key))
            .or_insert_with(|| Object::Set(SetValue::new(SetEncoding::IntSet)));
        (obj, inserted)
    }

    /// Opens the mutation bracket on an entry. Only the closing side moves
    /// the epoch today; eviction and watcher bookkeeping hang off this seam.
    pub fn pre_update(&mut self, _key: &[u8]) {}

    pub fn post_update(&mut self, _key: &[u8]) {
        self.version += 1;
    }

    pub fn del(&mut self, key: &[u8]) -> bool {
        let existed = self.dict.remove(key).is_some();
        if existed {
            self.version += 1;
        }
        existed
    }

    /// Plant a plain string value. Debug surface for exercising type
    /// mismatches; the set family never calls it.
    pub fn set_str(&mut self, key: &[u8], value: Bytes) {
        self.dict
            .insert(Bytes::copy_from_slice(key), Object::String(value));
        self.version += 1;
    }

    pub fn get_str(&self, key: &[u8]) -> OpResult<Bytes> {
        match self.find(key, DataType::String)? {
            Object::String(value) => Ok(value.clone()),
            _ => Err(OpStatus::Unexpected),
        }
    }

    /// Monotone update epoch; every concluded mutation moves it.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_statuses() {
        let mut db = DbSlice::new();
        assert_eq!(db.find(b"k", DataType::Set), Err(OpStatus::KeyNotFound));
        db.set_str(b"k", Bytes::from_static(b"v"));
        assert_eq!(db.find(b"k", DataType::Set), Err(OpStatus::WrongType));
        assert!(db.find(b"k", DataType::String).is_ok());
    }

    #[test]
    fn test_add_or_find() {
        let mut db = DbSlice::new();
        let (_, inserted) = db.add_or_find(b"s");
        assert!(inserted);
        let (_, inserted) = db.add_or_find(b"s");
        assert!(!inserted);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_del_moves_version() {
        let mut db = DbSlice::new();
        db.add_or_find(b"s");
        let before = db.version();
        assert!(db.del(b"s"));
        assert!(db.version() > before);
        assert!(!db.del(b"s"));
        assert!(!db.contains_key(b"s"));
    }
}
