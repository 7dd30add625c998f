// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Terra Asset: interactive geometry editing core for a 3D globe asset editor

fn main() -> anyhow::Result<()> {
    terra_asset::run()
}
