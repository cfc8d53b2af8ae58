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

//! Fan-in of per-shard partial results.
//!
//! Each multi-shard command pre-sizes one slot per shard, initialized to
//! `Skipped` so shards that contribute nothing by design stay invisible.
//! Members crossing shards are always owned byte strings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use engine::ShardId;
use parking_lot::Mutex;
use store::{OpResult, OpStatus};

/// One `OpResult` slot per shard, shared with the hop callbacks.
pub type ResultSet = Arc<Mutex<Vec<OpResult<Vec<Bytes>>>>>;

pub fn new_result_set(shards: usize) -> ResultSet {
    Arc::new(Mutex::new(vec![Err(OpStatus::Skipped); shards]))
}

/// Union: flatten every contribution; a missing key contributes nothing;
/// a wrong type aborts.
pub fn union_result_vec(results: &[OpResult<Vec<Bytes>>]) -> OpResult<HashSet<Bytes>> {
    let mut uniques = HashSet::new();

    for res in results {
        match res {
            Ok(members) => uniques.extend(members.iter().cloned()),
            Err(OpStatus::Skipped) | Err(OpStatus::KeyNotFound) => {}
            Err(status) => return Err(*status),
        }
    }

    Ok(uniques)
}

/// Difference: the source shard already subtracted its co-located keys;
/// every other shard's union is subtracted here. Any wrong type aborts
/// before the subtraction starts.
pub fn diff_result_vec(
    results: &[OpResult<Vec<Bytes>>],
    src_shard: ShardId,
) -> OpResult<HashSet<Bytes>> {
    for res in results {
        if let Err(OpStatus::WrongType) = res {
            return Err(OpStatus::WrongType);
        }
    }

    // an errored source (missing key) leaves nothing to subtract from
    let mut uniques: HashSet<Bytes> = match &results[src_shard] {
        Ok(members) => members.iter().cloned().collect(),
        Err(_) => HashSet::new(),
    };

    for (sid, res) in results.iter().enumerate() {
        if sid == src_shard {
            continue;
        }
        if let Ok(members) = res {
            for m in members {
                uniques.remove(m);
            }
        }
    }

    Ok(uniques)
}

/// Intersection: candidates come only from the first contributing shard;
/// a member survives when every contributing shard reported it. A missing
/// key anywhere empties the result.
pub fn inter_result_vec(
    results: &[OpResult<Vec<Bytes>>],
    required_shard_cnt: usize,
) -> OpResult<Vec<Bytes>> {
    let mut uniques: HashMap<Bytes, usize> = HashMap::new();
    let mut first = true;

    for res in results {
        match res {
            Err(OpStatus::Skipped) => continue,
            Err(OpStatus::KeyNotFound) => return Ok(Vec::new()),
            Err(status) => return Err(*status),
            Ok(members) => {
                if first {
                    // members absent from the first contributor can never
                    // survive, so they are never added
                    for m in members {
                        uniques.insert(m.clone(), 1);
                    }
                    first = false;
                } else {
                    for m in members {
                        if let Some(count) = uniques.get_mut(m) {
                            *count += 1;
                        }
                    }
                }
            }
        }
    }

    Ok(uniques
        .into_iter()
        .filter(|(_, count)| *count == required_shard_cnt)
        .map(|(member, _)| member)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(items: &[&str]) -> Vec<Bytes> {
        items
            .iter()
            .map(|s| Bytes::copy_from_slice(s.as_bytes()))
            .collect()
    }

    #[test]
    fn test_union_skips_benign_statuses() {
        let results = vec![
            Ok(members(&["a", "b"])),
            Err(OpStatus::Skipped),
            Err(OpStatus::KeyNotFound),
            Ok(members(&["b", "c"])),
        ];
        let set = union_result_vec(&results).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_union_aborts_on_wrong_type() {
        let results = vec![Ok(members(&["a"])), Err(OpStatus::WrongType)];
        assert_eq!(union_result_vec(&results), Err(OpStatus::WrongType));
    }

    #[test]
    fn test_diff_subtracts_other_shards() {
        let results = vec![
            Ok(members(&["a", "b", "c"])),
            Ok(members(&["b"])),
            Err(OpStatus::Skipped),
        ];
        let set = diff_result_vec(&results, 0).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Bytes::from_static(b"a")));
        assert!(set.contains(&Bytes::from_static(b"c")));
    }

    #[test]
    fn test_diff_missing_source_is_empty() {
        let results = vec![Err(OpStatus::KeyNotFound), Ok(members(&["x"]))];
        assert!(diff_result_vec(&results, 0).unwrap().is_empty());
    }

    #[test]
    fn test_inter_requires_every_contributor() {
        let results = vec![
            Ok(members(&["a", "b"])),
            Err(OpStatus::Skipped),
            Ok(members(&["b", "c"])),
        ];
        let out = inter_result_vec(&results, 2).unwrap();
        assert_eq!(out, members(&["b"]));
    }

    #[test]
    fn test_inter_missing_key_empties() {
        let results = vec![Ok(members(&["a"])), Err(OpStatus::KeyNotFound)];
        assert!(inter_result_vec(&results, 2).unwrap().is_empty());
    }

    #[test]
    fn test_inter_late_candidates_never_join() {
        // "c" appears only after the first contributor; it must not show up
        let results = vec![Ok(members(&["a"])), Ok(members(&["a", "c"]))];
        let out = inter_result_vec(&results, 2).unwrap();
        assert_eq!(out, members(&["a"]));
    }
}
