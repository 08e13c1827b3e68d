// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Piece keys.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid when other pieces
//! are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a placed piece.
    pub struct PieceKey;
}
