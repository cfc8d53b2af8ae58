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

//! Sorted packed array of distinct signed integers.
//!
//! Storage starts at 16 bits per element and widens to 32 or 64 bits the
//! first time a member needs it. Widening never reverses.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntSet {
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

impl Default for IntSet {
    fn default() -> Self {
        IntSet::I16(Vec::new())
    }
}

impl IntSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self {
            IntSet::I16(vals) => vals.len(),
            IntSet::I32(vals) => vals.len(),
            IntSet::I64(vals) => vals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, v: i64) -> bool {
        match self {
            // a value outside the current width cannot be a member
            IntSet::I16(vals) => i16::try_from(v)
                .map(|v| vals.binary_search(&v).is_ok())
                .unwrap_or(false),
            IntSet::I32(vals) => i32::try_from(v)
                .map(|v| vals.binary_search(&v).is_ok())
                .unwrap_or(false),
            IntSet::I64(vals) => vals.binary_search(&v).is_ok(),
        }
    }

    /// Insert `v` in sorted position, widening the storage first if needed.
    /// Returns false when `v` is already a member.
    pub fn add(&mut self, v: i64) -> bool {
        self.widen_for(v);
        match self {
            IntSet::I16(vals) => {
                let v = v as i16;
                match vals.binary_search(&v) {
                    Ok(_) => false,
                    Err(pos) => {
                        vals.insert(pos, v);
                        true
                    }
                }
            }
            IntSet::I32(vals) => {
                let v = v as i32;
                match vals.binary_search(&v) {
                    Ok(_) => false,
                    Err(pos) => {
                        vals.insert(pos, v);
                        true
                    }
                }
            }
            IntSet::I64(vals) => match vals.binary_search(&v) {
                Ok(_) => false,
                Err(pos) => {
                    vals.insert(pos, v);
                    true
                }
            },
        }
    }

    pub fn remove(&mut self, v: i64) -> bool {
        match self {
            IntSet::I16(vals) => match i16::try_from(v) {
                Ok(v) => match vals.binary_search(&v) {
                    Ok(pos) => {
                        vals.remove(pos);
                        true
                    }
                    Err(_) => false,
                },
                Err(_) => false,
            },
            IntSet::I32(vals) => match i32::try_from(v) {
                Ok(v) => match vals.binary_search(&v) {
                    Ok(pos) => {
                        vals.remove(pos);
                        true
                    }
                    Err(_) => false,
                },
                Err(_) => false,
            },
            IntSet::I64(vals) => match vals.binary_search(&v) {
                Ok(pos) => {
                    vals.remove(pos);
                    true
                }
                Err(_) => false,
            },
        }
    }

    /// In-order indexed access; index 0 is the smallest member.
    pub fn get(&self, index: usize) -> Option<i64> {
        match self {
            IntSet::I16(vals) => vals.get(index).map(|&v| i64::from(v)),
            IntSet::I32(vals) => vals.get(index).map(|&v| i64::from(v)),
            IntSet::I64(vals) => vals.get(index).copied(),
        }
    }

    /// Drop the last `k` (largest) members.
    pub fn trim_tail(&mut self, k: usize) {
        match self {
            IntSet::I16(vals) => vals.truncate(vals.len().saturating_sub(k)),
            IntSet::I32(vals) => vals.truncate(vals.len().saturating_sub(k)),
            IntSet::I64(vals) => vals.truncate(vals.len().saturating_sub(k)),
        }
    }

    /// Members in ascending numerical order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    fn widen_for(&mut self, v: i64) {
        match self {
            IntSet::I16(vals) if i16::try_from(v).is_err() => {
                if i32::try_from(v).is_ok() {
                    *self = IntSet::I32(vals.iter().map(|&x| i32::from(x)).collect());
                } else {
                    *self = IntSet::I64(vals.iter().map(|&x| i64::from(x)).collect());
                }
            }
            IntSet::I32(vals) if i32::try_from(v).is_err() => {
                *self = IntSet::I64(vals.iter().map(|&x| i64::from(x)).collect());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_sorted_distinct() {
        let mut set = IntSet::new();
        assert!(set.add(3));
        assert!(set.add(1));
        assert!(set.add(2));
        assert!(!set.add(2));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_widens_to_i32_and_i64() {
        let mut set = IntSet::new();
        set.add(1);
        assert!(matches!(set, IntSet::I16(_)));
        set.add(100_000);
        assert!(matches!(set, IntSet::I32(_)));
        set.add(i64::MIN);
        assert!(matches!(set, IntSet::I64(_)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![i64::MIN, 1, 100_000]);
        assert!(set.contains(1));
        assert!(set.contains(i64::MIN));
    }

    #[test]
    fn test_contains_out_of_width() {
        let mut set = IntSet::new();
        set.add(5);
        assert!(!set.contains(1 << 40));
    }

    #[test]
    fn test_remove() {
        let mut set = IntSet::new();
        set.add(1);
        set.add(2);
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(!set.remove(1 << 40));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_trim_tail() {
        let mut set = IntSet::new();
        for v in [10, 20, 30, 40] {
            set.add(v);
        }
        set.trim_tail(2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![10, 20]);
        set.trim_tail(10);
        assert!(set.is_empty());
    }

    #[test]
    fn test_get_in_order() {
        let mut set = IntSet::new();
        set.add(7);
        set.add(-3);
        assert_eq!(set.get(0), Some(-3));
        assert_eq!(set.get(1), Some(7));
        assert_eq!(set.get(2), None);
    }
}
