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

use bytes::Bytes;
use store::{
    DataType, DbSlice, Object, OpArgs, OpStatus, SetEncoding, op_add, op_diff, op_inter, op_pop,
    op_rem, op_union,
};

const MAX_ENTRIES: usize = 512;

fn vals(items: &[&str]) -> Vec<Bytes> {
    items
        .iter()
        .map(|s| Bytes::copy_from_slice(s.as_bytes()))
        .collect()
}

fn sorted(mut members: Vec<Bytes>) -> Vec<Bytes> {
    members.sort();
    members
}

fn add(db: &mut DbSlice, key: &[u8], items: &[&str]) -> u32 {
    let mut op_args = OpArgs {
        db,
        max_intset_entries: MAX_ENTRIES,
    };
    op_add(&mut op_args, key, &vals(items), false).unwrap()
}

fn encoding_of(db: &DbSlice, key: &[u8]) -> SetEncoding {
    match db.find(key, DataType::Set).unwrap() {
        Object::Set(set) => set.encoding(),
        _ => panic!("not a set"),
    }
}

#[test]
fn test_op_add_counts_new_members_only() {
    let mut db = DbSlice::new();
    assert_eq!(add(&mut db, b"s", &["1", "2", "3"]), 3);
    assert_eq!(add(&mut db, b"s", &["2", "3", "4"]), 1);
    assert_eq!(encoding_of(&db, b"s"), SetEncoding::IntSet);
}

#[test]
fn test_op_add_upgrades_mid_loop() {
    let mut db = DbSlice::new();
    add(&mut db, b"s", &["1", "2"]);
    // "5" lands after the upgrade triggered by "x"
    assert_eq!(add(&mut db, b"s", &["3", "x", "5"]), 3);
    assert_eq!(encoding_of(&db, b"s"), SetEncoding::FlatSet);
    let members = op_union(&db, &vals(&["s"])).unwrap();
    assert_eq!(sorted(members), sorted(vals(&["1", "2", "3", "5", "x"])));
}

#[test]
fn test_op_add_ceiling_upgrade() {
    let mut db = DbSlice::new();
    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: 4,
    };
    assert_eq!(
        op_add(&mut op_args, b"s", &vals(&["1", "2", "3", "4"]), false).unwrap(),
        4
    );
    assert_eq!(encoding_of(&db, b"s"), SetEncoding::IntSet);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: 4,
    };
    assert_eq!(op_add(&mut op_args, b"s", &vals(&["5"]), false).unwrap(), 1);
    assert_eq!(encoding_of(&db, b"s"), SetEncoding::FlatSet);
}

#[test]
fn test_op_add_wrong_type() {
    let mut db = DbSlice::new();
    db.set_str(b"k", Bytes::from_static(b"v"));
    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(
        op_add(&mut op_args, b"k", &vals(&["1"]), false),
        Err(OpStatus::WrongType)
    );
}

#[test]
fn test_op_add_overwrite_replaces_and_deletes() {
    let mut db = DbSlice::new();
    db.set_str(b"k", Bytes::from_static(b"v"));

    // overwrite ignores the previous type
    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(op_add(&mut op_args, b"k", &vals(&["a", "b"]), true).unwrap(), 2);
    assert_eq!(encoding_of(&db, b"k"), SetEncoding::FlatSet);

    // overwrite with nothing removes the key
    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(op_add(&mut op_args, b"k", &[], true).unwrap(), 0);
    assert!(!db.contains_key(b"k"));
}

#[test]
fn test_op_rem_deletes_emptied_key() {
    let mut db = DbSlice::new();
    add(&mut db, b"s", &["1", "2", "3"]);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    // non-integers and absent members count zero
    assert_eq!(op_rem(&mut op_args, b"s", &vals(&["2", "9", "x"])).unwrap(), 1);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(op_rem(&mut op_args, b"s", &vals(&["1", "3"])).unwrap(), 2);
    assert!(!db.contains_key(b"s"));

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(
        op_rem(&mut op_args, b"s", &vals(&["1"])),
        Err(OpStatus::KeyNotFound)
    );
}

#[test]
fn test_op_pop_partial_intset_takes_tail() {
    let mut db = DbSlice::new();
    add(&mut db, b"s", &["1", "2", "3", "4", "5"]);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    let popped = op_pop(&mut op_args, b"s", 2).unwrap();
    assert_eq!(sorted(popped), vals(&["4", "5"]));

    let remaining = op_union(&db, &vals(&["s"])).unwrap();
    assert_eq!(sorted(remaining), vals(&["1", "2", "3"]));
}

#[test]
fn test_op_pop_whole_set_deletes_key() {
    let mut db = DbSlice::new();
    add(&mut db, b"s", &["a", "b", "c"]);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    let popped = op_pop(&mut op_args, b"s", 100).unwrap();
    assert_eq!(popped.len(), 3);
    assert!(!db.contains_key(b"s"));
}

#[test]
fn test_op_pop_zero_and_missing() {
    let mut db = DbSlice::new();
    add(&mut db, b"s", &["a"]);

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert!(op_pop(&mut op_args, b"s", 0).unwrap().is_empty());

    let mut op_args = OpArgs {
        db: &mut db,
        max_intset_entries: MAX_ENTRIES,
    };
    assert_eq!(op_pop(&mut op_args, b"none", 1), Err(OpStatus::KeyNotFound));
}

#[test]
fn test_op_union_local() {
    let mut db = DbSlice::new();
    add(&mut db, b"a", &["1", "2"]);
    add(&mut db, b"b", &["2", "x"]);

    let members = op_union(&db, &vals(&["a", "b", "missing"])).unwrap();
    assert_eq!(sorted(members), sorted(vals(&["1", "2", "x"])));

    db.set_str(b"str", Bytes::from_static(b"v"));
    assert_eq!(
        op_union(&db, &vals(&["a", "str"])),
        Err(OpStatus::WrongType)
    );
}

#[test]
fn test_op_diff_local() {
    let mut db = DbSlice::new();
    add(&mut db, b"a", &["1", "2", "3"]);
    add(&mut db, b"b", &["2", "4"]);

    let members = op_diff(&db, &vals(&["a", "b", "missing"])).unwrap();
    assert_eq!(sorted(members), vals(&["1", "3"]));

    assert_eq!(
        op_diff(&db, &vals(&["missing", "a"])),
        Err(OpStatus::KeyNotFound)
    );
}

#[test]
fn test_op_inter_local_smallest_first() {
    let mut db = DbSlice::new();
    add(&mut db, b"a", &["1", "2", "3", "4"]);
    add(&mut db, b"b", &["2", "3"]);
    add(&mut db, b"c", &["2", "3", "5"]);

    let members = op_inter(&db, &vals(&["a", "b", "c"]), false).unwrap();
    assert_eq!(sorted(members), vals(&["2", "3"]));

    // a missing key empties the intersection via its status
    assert_eq!(
        op_inter(&db, &vals(&["a", "missing"]), false),
        Err(OpStatus::KeyNotFound)
    );
}

#[test]
fn test_op_inter_remove_first() {
    let mut db = DbSlice::new();
    add(&mut db, b"dest", &["9"]);
    add(&mut db, b"a", &["1", "2"]);

    let members = op_inter(&db, &vals(&["dest", "a"]), true).unwrap();
    assert_eq!(sorted(members), vals(&["1", "2"]));
}

#[test]
fn test_op_inter_mixed_encodings() {
    let mut db = DbSlice::new();
    add(&mut db, b"ints", &["1", "2", "3"]);
    add(&mut db, b"mixed", &["2", "3", "hello"]);

    let members = op_inter(&db, &vals(&["ints", "mixed"]), false).unwrap();
    assert_eq!(sorted(members), vals(&["2", "3"]));
}
