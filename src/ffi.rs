use libc::{c_schar, c_void, size_t};
use std::ptr;
use std::slice;

use crate::jenks_breaks;

/// Wrapper for a void pointer to a sequence of [`InternalArray`]s, and the sequence length.
/// Used for FFI.
///
/// Each sequence entry represents one Jenks class.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct WrapperArray {
    pub data: *const InternalArray,
    pub len: size_t,
}

/// Wrapper for a void pointer to a sequence of floats representing one Jenks class, and the
/// sequence length. Used for FFI.
///
/// `data` is a `Vec<c_double>`.
#[repr(C)]
#[derive(Clone)]
pub struct InternalArray {
    pub data: *const c_void,
    pub len: size_t,
}

/// Wrapper for a void pointer to a sequence of floats representing either data to be classified
/// or computed break values, and the sequence length. Used for FFI.
///
/// `data` is a `Vec<c_double>`.
#[repr(C)]
pub struct ExternalArray {
    pub data: *const c_void,
    pub len: size_t,
}

/// We don't need to take ownership of incoming data to be classified: the engine sorts a copy
impl From<&ExternalArray> for &[f64] {
    fn from(arr: &ExternalArray) -> Self {
        unsafe { slice::from_raw_parts(arr.data as *mut f64, arr.len) }
    }
}

// Convert individual classes into things that can be leaked across the FFI boundary
impl From<Vec<f64>> for InternalArray {
    fn from(v: Vec<f64>) -> Self {
        let boxed = v.into_boxed_slice();
        let blen = boxed.len();
        let rawp = Box::into_raw(boxed);
        InternalArray {
            data: rawp as *const libc::c_void,
            len: blen as libc::size_t,
        }
    }
}

impl From<Vec<f64>> for ExternalArray {
    fn from(v: Vec<f64>) -> Self {
        let boxed = v.into_boxed_slice();
        let blen = boxed.len();
        let rawp = Box::into_raw(boxed);
        ExternalArray {
            data: rawp as *const libc::c_void,
            len: blen as libc::size_t,
        }
    }
}

impl From<Vec<Vec<f64>>> for WrapperArray {
    fn from(arr: Vec<Vec<f64>>) -> Self {
        let iarrs: Vec<InternalArray> = arr.into_iter().map(|member| member.into()).collect();
        let boxed = iarrs.into_boxed_slice();
        let blen = boxed.len();
        let rawp = Box::into_raw(boxed);
        WrapperArray {
            data: rawp as *const InternalArray,
            len: blen as libc::size_t,
        }
    }
}

// Reconstitute a breaks result that has been returned across the FFI boundary so it can be dropped
impl From<ExternalArray> for Vec<f64> {
    fn from(arr: ExternalArray) -> Self {
        // we originated this data, so pointer-to-slice -> box -> vec
        unsafe {
            let p = ptr::slice_from_raw_parts_mut(arr.data as *mut f64, arr.len);
            Box::from_raw(p).to_vec()
        }
    }
}

// Reconstitute individual classes so they can be eventually dropped
impl From<InternalArray> for Vec<f64> {
    fn from(arr: InternalArray) -> Self {
        unsafe {
            let p = ptr::slice_from_raw_parts_mut(arr.data as *mut f64, arr.len);
            Box::from_raw(p).to_vec()
        }
    }
}

// Reconstitute a groups result that has been returned across the FFI boundary so it can be dropped
impl From<WrapperArray> for Vec<Vec<f64>> {
    fn from(arr: WrapperArray) -> Self {
        let arrays = unsafe {
            let p = ptr::slice_from_raw_parts_mut(arr.data as *mut InternalArray, arr.len);
            Box::from_raw(p).to_vec()
        };
        arrays.into_iter().map(|arr| arr.into()).collect()
    }
}

/// Compute the break values of `data` for `classes` classes. On invalid
/// input (fewer than two classes, or not enough finite values) the returned
/// array has a null `data` pointer and a zero length; callers must check
/// before reading.
#[unsafe(no_mangle)]
pub extern "C" fn jenks_breaks_ffi(data: &ExternalArray, classes: c_schar) -> ExternalArray {
    match jenks_breaks(data.into(), classes as u8) {
        Ok(breaks) => breaks.into(),
        Err(_) => ExternalArray {
            data: ptr::null(),
            len: 0,
        },
    }
}

/// Free a result of [`jenks_breaks_ffi`]. A no-op on the null error sentinel.
#[unsafe(no_mangle)]
pub extern "C" fn drop_jenks_breaks(result: ExternalArray) {
    if result.data.is_null() {
        return;
    }
    let _: Vec<f64> = result.into();
}

/// Partition `data` into `classes` per-class arrays. The same null-`data`,
/// zero-length sentinel as [`jenks_breaks_ffi`] signals invalid input.
#[cfg(feature = "classification")]
#[unsafe(no_mangle)]
pub extern "C" fn jenks_groups_ffi(data: &ExternalArray, classes: c_schar) -> WrapperArray {
    let values: &[f64] = data.into();
    match jenks_breaks(values, classes as u8) {
        Ok(breaks) => crate::group(values, &breaks[1..breaks.len() - 1]).into(),
        Err(_) => WrapperArray {
            data: ptr::null(),
            len: 0,
        },
    }
}

/// Free a result of [`jenks_groups_ffi`]. A no-op on the null error sentinel.
#[cfg(feature = "classification")]
#[unsafe(no_mangle)]
pub extern "C" fn drop_jenks_groups(result: WrapperArray) {
    if result.data.is_null() {
        return;
    }
    let _: Vec<Vec<f64>> = result.into();
}
