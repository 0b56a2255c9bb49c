//! Device matrix to transform conversion

use crate::pose::types::{Matrix34, Transform};

/// Split a 3x4 device matrix into translation (last column) and
/// rotation (leading 3x3 block). Pure reshape, no normalization.
pub fn convert_matrix(mat: &Matrix34) -> Transform {
    Transform {
        translation: [mat[0][3], mat[1][3], mat[2][3]],
        rotation: [
            [mat[0][0], mat[0][1], mat[0][2]],
            [mat[1][0], mat[1][1], mat[1][2]],
            [mat[2][0], mat[2][1], mat[2][2]],
        ],
    }
}
