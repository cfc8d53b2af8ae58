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

//! Shard-local set operations.
//!
//! Every function here runs on the shard thread that owns the dictionary,
//! inside a transaction callback, and only sees keys routed to that shard.
//! Multi-key read ops take the shard's argument slice; cross-shard
//! reduction happens in the command-layer combiners.

use std::collections::HashSet;

use bytes::Bytes;

use crate::db_slice::{DataType, DbSlice, Object};
use crate::op_status::{OpResult, OpStatus};
use crate::set_value::SetValue;
use crate::util::format_int;

/// Execution context handed to mutating ops: the owning shard's dictionary
/// for the transaction's database plus the intset ceiling (already clamped).
pub struct OpArgs<'a> {
    pub db: &'a mut DbSlice,
    pub max_intset_entries: usize,
}

/// Add `vals` to the set at `key`, creating it if needed. With `overwrite`
/// the previous value (of any type) is discarded first; an overwrite with
/// no values deletes the key. Returns the number of newly added members.
pub fn op_add(op_args: &mut OpArgs<'_>, key: &[u8], vals: &[Bytes], overwrite: bool) -> OpResult<u32> {
    if overwrite && vals.is_empty() {
        op_args.db.del(key);
        return Ok(0);
    }

    let max_entries = op_args.max_intset_entries;
    let existed = op_args.db.contains_key(key);
    if existed {
        op_args.db.pre_update(key);
    }

    let (obj, inserted) = op_args.db.add_or_find(key);
    if inserted || overwrite {
        *obj = Object::Set(SetValue::new(SetValue::pick_encoding(vals)));
    } else if obj.data_type() != DataType::Set {
        return Err(OpStatus::WrongType);
    }

    let Some(set) = obj.as_set_mut() else {
        return Err(OpStatus::Unexpected);
    };

    let mut added = 0u32;
    for v in vals {
        if set.add(v, max_entries) {
            added += 1;
        }
    }

    op_args.db.post_update(key);
    Ok(added)
}

/// Remove `vals` from the set at `key`; the key is deleted when the last
/// member goes. Returns the number of members actually removed.
pub fn op_rem(op_args: &mut OpArgs<'_>, key: &[u8], vals: &[Bytes]) -> OpResult<u32> {
    op_args.db.find(key, DataType::Set)?;
    op_args.db.pre_update(key);

    let obj = op_args.db.find_mut(key, DataType::Set)?;
    let Some(set) = obj.as_set_mut() else {
        return Err(OpStatus::Unexpected);
    };

    let mut removed = 0u32;
    for v in vals {
        if set.remove(v) {
            removed += 1;
        }
    }
    let empty = set.size() == 0;

    if empty {
        op_args.db.del(key);
    } else {
        op_args.db.post_update(key);
    }
    Ok(removed)
}

/// Pop up to `count` members. Popping the whole set deletes the key.
/// Selection is not randomized: the intset gives up its tail (largest
/// values), the flat set its iteration head.
pub fn op_pop(op_args: &mut OpArgs<'_>, key: &[u8], count: u32) -> OpResult<Vec<Bytes>> {
    let slen = match op_args.db.find(key, DataType::Set)? {
        Object::Set(set) => set.size(),
        _ => return Err(OpStatus::Unexpected),
    };
    if count == 0 {
        return Ok(Vec::new());
    }

    op_args.db.pre_update(key);

    if count as usize >= slen {
        let result = match op_args.db.find(key, DataType::Set)? {
            Object::Set(set) => set.members(),
            _ => return Err(OpStatus::Unexpected),
        };
        op_args.db.del(key);
        return Ok(result);
    }

    let obj = op_args.db.find_mut(key, DataType::Set)?;
    let Some(set) = obj.as_set_mut() else {
        return Err(OpStatus::Unexpected);
    };

    let count = count as usize;
    let mut result = Vec::with_capacity(count);
    match set {
        SetValue::IntSet(is) => {
            for i in slen - count..slen {
                if let Some(v) = is.get(i) {
                    result.push(format_int(v));
                }
            }
            is.trim_tail(count);
        }
        SetValue::FlatSet(fs) => {
            for _ in 0..count {
                if let Some(m) = fs.take_first() {
                    result.push(m);
                }
            }
        }
    }

    op_args.db.post_update(key);
    Ok(result)
}

/// Union of the sets at `keys`. Missing keys contribute nothing; a wrong
/// type aborts.
pub fn op_union(db: &DbSlice, keys: &[Bytes]) -> OpResult<Vec<Bytes>> {
    debug_assert!(!keys.is_empty());
    let mut uniques: HashSet<Bytes> = HashSet::new();

    for key in keys {
        match db.find(key, DataType::Set) {
            Ok(Object::Set(set)) => set.for_each(|m| {
                uniques.insert(m);
            }),
            Ok(_) => return Err(OpStatus::Unexpected),
            Err(OpStatus::KeyNotFound) => continue,
            Err(status) => return Err(status),
        }
    }

    Ok(uniques.into_iter().collect())
}

/// Difference rooted at `keys[0]`: the members of the source minus every
/// other key routed to this shard. The source's find status propagates;
/// missing subtrahends are skipped.
pub fn op_diff(db: &DbSlice, keys: &[Bytes]) -> OpResult<Vec<Bytes>> {
    debug_assert!(!keys.is_empty());

    let mut uniques: HashSet<Bytes> = match db.find(&keys[0], DataType::Set)? {
        Object::Set(set) => set.members().into_iter().collect(),
        _ => return Err(OpStatus::Unexpected),
    };

    for key in &keys[1..] {
        match db.find(key, DataType::Set) {
            Ok(Object::Set(set)) => set.for_each(|m| {
                uniques.remove(&m);
            }),
            Ok(_) => return Err(OpStatus::Unexpected),
            Err(OpStatus::KeyNotFound) => continue,
            Err(status) => return Err(status),
        }
    }

    Ok(uniques.into_iter().collect())
}

/// Intersection of the keys routed to this shard. `remove_first` drops the
/// leading argument (the destination key of a store command living here).
/// The first find error in key order propagates; a missing key makes the
/// whole intersection empty, which `KeyNotFound` signals to the combiner.
pub fn op_inter(db: &DbSlice, keys: &[Bytes], remove_first: bool) -> OpResult<Vec<Bytes>> {
    let keys = if remove_first { &keys[1..] } else { keys };
    debug_assert!(!keys.is_empty());

    if keys.len() == 1 {
        let obj = db.find(&keys[0], DataType::Set)?;
        let Some(set) = obj.as_set() else {
            return Err(OpStatus::Unexpected);
        };
        return Ok(set.members());
    }

    let mut sets: Vec<&SetValue> = Vec::with_capacity(keys.len());
    for key in keys {
        let obj = db.find(key, DataType::Set)?;
        let Some(set) = obj.as_set() else {
            return Err(OpStatus::Unexpected);
        };
        sets.push(set);
    }

    // probe the smallest set against all the others
    sets.sort_by_key(|s| s.size());
    let mut result = Vec::new();
    sets[0].for_each(|m| {
        if sets[1..].iter().all(|s| s.is_member(&m)) {
            result.push(m);
        }
    });

    Ok(result)
}
