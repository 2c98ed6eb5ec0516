// Copyright (C) 2024 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use rand::prelude::*;
use rand_distr::Uniform;
use std::cell::RefCell;

thread_local! {
    static GENERATOR: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
}

pub fn set_seed(seed: u64) {
    GENERATOR.with(|g| {
        *g.borrow_mut() = StdRng::seed_from_u64(seed);
    });
}

pub fn uniform(low: f32, high: f32, size: usize) -> Vec<f32> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return vec![low; size];
    }
    let uniform = Uniform::new(low, high);
    GENERATOR.with(|g| {
        (0..size)
            .map(|_| uniform.sample(&mut *g.borrow_mut()))
            .collect()
    })
}

/// Single draw from `[low, high)`. Collapses to `low` for an empty or non-finite range.
pub fn uniform_scalar(low: f32, high: f32) -> f32 {
    uniform(low, high, 1)[0]
}

/// Single draw from `[low, high]` over indices.
pub fn index_in(low: usize, high: usize) -> usize {
    if low >= high {
        return low;
    }
    GENERATOR.with(|g| g.borrow_mut().gen_range(low..=high))
}

pub fn bernoulli(p: f32, size: usize) -> Vec<bool> {
    GENERATOR.with(|g| (0..size).map(|_| g.borrow_mut().gen::<f32>() < p).collect())
}

pub fn shuffle<T>(items: &mut [T]) {
    GENERATOR.with(|g| items.shuffle(&mut *g.borrow_mut()));
}
