use {
    crate::*,
    std::{
        ffi::{CStr, CString, c_char, c_int, c_void},
        ptr::{null, null_mut},
        sync::Arc,
    },
};

/// A loaded model, ready to run
pub struct Session {
    pub onnx: Arc<Onnx>,
    session: *mut ffi::OrtSession,
}

// OrtSession may move between threads; callers serialize access via &mut.
unsafe impl Send for Session {}

impl Session {
    pub(crate) fn from_raw(onnx: &Arc<Onnx>, session: *mut ffi::OrtSession) -> Self {
        Session {
            onnx: Arc::clone(onnx),
            session,
        }
    }

    pub fn input_count(&self) -> Result<usize> {
        let mut count: usize = 0;
        let status = unsafe { (self.onnx.session_get_input_count)(self.session, &mut count as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        Ok(count)
    }

    pub fn output_count(&self) -> Result<usize> {
        let mut count: usize = 0;
        let status =
            unsafe { (self.onnx.session_get_output_count)(self.session, &mut count as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        Ok(count)
    }

    pub fn input_name(&self, index: usize) -> Result<String> {
        self.name(self.onnx.session_get_input_name, index)
    }

    pub fn output_name(&self, index: usize) -> Result<String> {
        self.name(self.onnx.session_get_output_name, index)
    }

    /// Declared type of input `index`
    pub fn input_type(&self, index: usize) -> Result<TypeInfo> {
        self.type_info(self.onnx.session_get_input_type_info, index)
    }

    /// Declared type of output `index`
    pub fn output_type(&self, index: usize) -> Result<TypeInfo> {
        self.type_info(self.onnx.session_get_output_type_info, index)
    }

    // Names come from the environment allocator and go straight back to it.
    fn name(&self, get_name: ffi::SessionGetNameFn, index: usize) -> Result<String> {
        let mut name_ptr: *mut c_char = null_mut();
        let status =
            unsafe { get_name(self.session, index, self.onnx.allocator, &mut name_ptr as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        if name_ptr.is_null() {
            return Err(OnnxError::runtime_error(format!("No name for index {}", index)));
        }

        let name = unsafe { CStr::from_ptr(name_ptr) }
            .to_string_lossy()
            .into_owned();

        let status = unsafe { (self.onnx.allocator_free)(self.onnx.allocator, name_ptr as *mut c_void) };
        unsafe { error::check_status(self.onnx.api, status)? };

        Ok(name)
    }

    fn type_info(&self, get_type_info: ffi::SessionGetTypeInfoFn, index: usize) -> Result<TypeInfo> {
        let mut type_info: *mut ffi::OrtTypeInfo = null_mut();
        let status = unsafe { get_type_info(self.session, index, &mut type_info as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };

        let result = self.decode_type_info(type_info);
        unsafe { (self.onnx.release_type_info)(type_info) };
        result
    }

    fn decode_type_info(&self, type_info: *const ffi::OrtTypeInfo) -> Result<TypeInfo> {
        let api = self.onnx.api;

        let mut raw_kind: c_int = 0;
        let status = unsafe { (self.onnx.get_onnx_type_from_type_info)(type_info, &mut raw_kind as *mut _) };
        unsafe { error::check_status(api, status)? };
        let kind = OnnxType::from_raw(raw_kind);
        if kind != OnnxType::Tensor {
            return Ok(TypeInfo::Other(kind));
        }

        // borrowed from type_info, not released separately
        let mut tensor_info: *const ffi::OrtTensorTypeAndShapeInfo = null();
        let status =
            unsafe { (self.onnx.cast_type_info_to_tensor_info)(type_info, &mut tensor_info as *mut _) };
        unsafe { error::check_status(api, status)? };
        if tensor_info.is_null() {
            return Ok(TypeInfo::Other(kind));
        }

        let mut raw_element: c_int = 0;
        let status =
            unsafe { (self.onnx.get_tensor_element_type)(tensor_info, &mut raw_element as *mut _) };
        unsafe { error::check_status(api, status)? };
        let element_type = ElementType::from_raw(raw_element).ok_or_else(|| {
            OnnxError::runtime_error(format!("Unknown tensor element type {}", raw_element))
        })?;

        let mut dim_count: usize = 0;
        let status = unsafe { (self.onnx.get_dimensions_count)(tensor_info, &mut dim_count as *mut _) };
        unsafe { error::check_status(api, status)? };

        let mut shape = vec![0i64; dim_count];
        let status = unsafe { (self.onnx.get_dimensions)(tensor_info, shape.as_mut_ptr(), dim_count) };
        unsafe { error::check_status(api, status)? };

        Ok(TypeInfo::Tensor {
            element_type,
            shape,
        })
    }

    /// Run the model with named inputs and return the named outputs in order
    ///
    /// Default run options. Blocks until the runtime returns.
    pub fn run(&mut self, inputs: &[(&str, &Value)], output_names: &[&str]) -> Result<Vec<Value>> {
        let input_name_cstrings = inputs
            .iter()
            .map(|(name, _)| {
                CString::new(*name).map_err(|_| OnnxError::runtime_error("Null byte in input name"))
            })
            .collect::<Result<Vec<_>>>()?;
        let input_name_ptrs: Vec<*const c_char> =
            input_name_cstrings.iter().map(|s| s.as_ptr()).collect();
        let input_value_ptrs: Vec<*const ffi::OrtValue> =
            inputs.iter().map(|(_, value)| value.as_ptr()).collect();

        let output_name_cstrings = output_names
            .iter()
            .map(|name| {
                CString::new(*name).map_err(|_| OnnxError::runtime_error("Null byte in output name"))
            })
            .collect::<Result<Vec<_>>>()?;
        let output_name_ptrs: Vec<*const c_char> =
            output_name_cstrings.iter().map(|s| s.as_ptr()).collect();

        let mut output_value_ptrs: Vec<*mut ffi::OrtValue> = vec![null_mut(); output_names.len()];

        let status = unsafe {
            (self.onnx.run)(
                self.session,
                null(),
                input_name_ptrs.as_ptr(),
                input_value_ptrs.as_ptr(),
                inputs.len(),
                output_name_ptrs.as_ptr(),
                output_names.len(),
                output_value_ptrs.as_mut_ptr(),
            )
        };

        // wrap first so partial outputs are released on failure
        let outputs: Vec<Value> = output_value_ptrs
            .into_iter()
            .filter(|ptr| !ptr.is_null())
            .map(|ptr| unsafe { Value::from_raw(&self.onnx, ptr) })
            .collect();
        unsafe { error::check_status(self.onnx.api, status)? };

        if outputs.len() != output_names.len() {
            return Err(OnnxError::runtime_error(format!(
                "Run returned {} outputs, expected {}",
                outputs.len(),
                output_names.len()
            )));
        }
        Ok(outputs)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.session.is_null() {
            unsafe { (self.onnx.release_session)(self.session) };
        }
    }
}
