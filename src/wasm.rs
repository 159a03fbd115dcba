use crate::jenks_breaks;
use js_sys::Array;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

fn inner_vec_to_js_array(data: Vec<f64>) -> Array {
    let array = Array::new();
    for num in data {
        array.push(&JsValue::from_f64(num));
    }
    array
}

// Convert a groups result to a nested Array suitable for use by a JS function
pub fn wrapper_vec_to_js_array(data: Vec<Vec<f64>>) -> Array {
    let outer_array = Array::new();
    for inner_vec in data {
        outer_array.push(&inner_vec_to_js_array(inner_vec));
    }
    outer_array
}

#[wasm_bindgen]
pub fn jenks_breaks_wasm(data: &[f64], nclasses: u8) -> Result<Array, JsError> {
    let breaks = jenks_breaks(data, nclasses).map_err(JsError::from)?;
    Ok(inner_vec_to_js_array(breaks))
}

#[cfg(feature = "classification")]
#[wasm_bindgen]
pub fn jenks_groups_wasm(data: &[f64], nclasses: u8) -> Result<Array, JsError> {
    let breaks = jenks_breaks(data, nclasses).map_err(JsError::from)?;
    let groups = crate::group(data, &breaks[1..breaks.len() - 1]);
    Ok(wrapper_vec_to_js_array(groups))
}
