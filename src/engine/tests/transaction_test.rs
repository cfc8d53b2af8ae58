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

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use conf::Config;
use engine::{ShardSet, Transaction, no_op_cb};
use parking_lot::Mutex;
use store::op_add;

fn keys(items: &[&str]) -> Vec<Bytes> {
    items
        .iter()
        .map(|s| Bytes::copy_from_slice(s.as_bytes()))
        .collect()
}

#[test]
fn test_routing_preserves_order() {
    let shard_set = ShardSet::new(&Config::default()).unwrap();
    let args = keys(&["a", "b", "c", "d", "e"]);
    let tx = Transaction::new(&shard_set, 0, &args);

    let mut seen = Vec::new();
    for sid in 0..shard_set.size() {
        for key in tx.ctx().shard_args_in_shard(sid) {
            assert_eq!(shard_set.shard_of(key), sid);
            seen.push(key.clone());
        }
    }
    seen.sort();
    let mut expected = args.clone();
    expected.sort();
    assert_eq!(seen, expected);
    assert!(tx.unique_shard_cnt() >= 1);
    assert!(tx.unique_shard_cnt() <= args.len());
}

#[test]
fn test_single_hop_returns_shard_result() {
    let shard_set = ShardSet::new(&Config::default()).unwrap();
    let key = Bytes::from_static(b"s");
    let args = keys(&["s"]);
    let mut tx = Transaction::new(&shard_set, 0, &args);

    let vals = keys(&["1", "2", "2"]);
    let added = tx
        .schedule_single_hop_t(move |ctx, shard| {
            let mut op_args = shard.op_args(ctx.db_index());
            op_add(&mut op_args, &key, &vals, false)
        })
        .unwrap();
    assert_eq!(added, 2);
}

#[test]
fn test_databases_are_isolated() {
    let shard_set = ShardSet::new(&Config::default()).unwrap();
    let key = Bytes::from_static(b"s");

    for db_index in [0usize, 1] {
        let key = key.clone();
        let mut tx = Transaction::new(&shard_set, db_index, &keys(&["s"]));
        tx.schedule_single_hop_t(move |ctx, shard| {
            let mut op_args = shard.op_args(ctx.db_index());
            op_add(&mut op_args, &key, &keys(&["1"]), false)
        })
        .unwrap();
    }

    let key2 = key.clone();
    let size = |db_index: usize| {
        let key = key2.clone();
        let mut tx = Transaction::new(&shard_set, db_index, &keys(&["s"]));
        tx.schedule_single_hop_t(move |ctx, shard| {
            use store::{DataType, Object};
            match shard.db_slice(ctx.db_index()).find(&key, DataType::Set)? {
                Object::Set(set) => Ok(set.size()),
                _ => unreachable!(),
            }
        })
        .unwrap()
    };
    assert_eq!(size(0), 1);
    assert_eq!(size(1), 1);
}

// A second transaction on the same key must not run between the hops of a
// scheduled multi-hop transaction.
#[test]
fn test_no_interleaving_between_hops() {
    let shard_set = ShardSet::new(&Config::default()).unwrap();
    let trace: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let args = keys(&["contended"]);

    let mut tx1 = Transaction::new(&shard_set, 0, &args);
    tx1.schedule();

    let t1 = trace.clone();
    tx1.execute(
        move |_, _| {
            t1.lock().push("tx1-hop1");
            Ok(())
        },
        false,
    );

    // tx2 targets the same key from another thread; it must wait for tx1's
    // concluding hop
    let contender = {
        let shard_set = shard_set.clone();
        let trace = trace.clone();
        let args = args.clone();
        std::thread::spawn(move || {
            let mut tx2 = Transaction::new(&shard_set, 0, &args);
            tx2.schedule_single_hop(move |_, _| {
                trace.lock().push("tx2");
                Ok(())
            });
        })
    };

    // give tx2 a chance to jump the queue if the protocol were broken
    std::thread::sleep(Duration::from_millis(50));

    let t1 = trace.clone();
    tx1.execute(
        move |_, _| {
            t1.lock().push("tx1-hop2");
            Ok(())
        },
        true,
    );
    contender.join().unwrap();

    assert_eq!(*trace.lock(), vec!["tx1-hop1", "tx1-hop2", "tx2"]);
}

#[test]
fn test_error_path_concludes_with_noop() {
    let shard_set = ShardSet::new(&Config::default()).unwrap();
    let args = keys(&["k1", "k2", "k3"]);

    let mut tx1 = Transaction::new(&shard_set, 0, &args);
    tx1.schedule();
    tx1.execute(|_, _| Ok(()), false);
    // abort: conclude with the no-op so the queue advances
    tx1.execute(no_op_cb, true);

    // the shards are free again
    let mut tx2 = Transaction::new(&shard_set, 0, &args);
    let done = Arc::new(Mutex::new(0usize));
    let count = done.clone();
    tx2.schedule_single_hop(move |_, _| {
        *count.lock() += 1;
        Ok(())
    });
    assert_eq!(*done.lock(), tx2.unique_shard_cnt());
}
