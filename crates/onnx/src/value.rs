use {
    crate::*,
    std::{
        any::Any,
        ffi::{c_int, c_void},
        ptr::null_mut,
        sync::Arc,
    },
};

mod sealed {
    pub trait Sealed {}
}

/// Types that can back a tensor
pub trait TensorElement: sealed::Sealed + Sized + Copy + Send + 'static {
    fn element_type() -> ElementType;
}

macro_rules! tensor_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl TensorElement for $ty {
                fn element_type() -> ElementType {
                    ElementType::$variant
                }
            }
        )*
    };
}

tensor_element! {
    f32 => Float,
    f64 => Double,
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
}

/// ONNX Runtime value
///
/// Values built from Rust data keep that data alive for as long as the value,
/// since the runtime only borrows it.
pub struct Value {
    onnx: Arc<Onnx>,
    value: *mut ffi::OrtValue,
    _data: Option<Box<dyn Any + Send>>,
}

unsafe impl Send for Value {}

impl Value {
    /// Wrap `data` as a tensor of `shape` without copying it
    pub fn from_vec<T: TensorElement>(onnx: &Arc<Onnx>, shape: &[usize], mut data: Vec<T>) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(OnnxError::runtime_error(format!(
                "Data length {} doesn't match shape {:?} (expected {})",
                data.len(),
                shape,
                expected_len
            )));
        }

        let mut memory_info: *mut ffi::OrtMemoryInfo = null_mut();
        let status = unsafe {
            (onnx.create_memory_info)(
                ffi::OrtAllocatorType::Arena,
                ffi::OrtMemType::Default,
                &mut memory_info as *mut _,
            )
        };
        unsafe { error::check_status(onnx.api, status)? };

        let shape_i64: Vec<i64> = shape.iter().map(|&s| s as i64).collect();
        let byte_len = data.len() * std::mem::size_of::<T>();

        // the heap buffer does not move when the Vec is boxed below
        let data_ptr = data.as_mut_ptr() as *mut c_void;
        let mut value: *mut ffi::OrtValue = null_mut();
        let status = unsafe {
            (onnx.create_tensor)(
                memory_info,
                data_ptr,
                byte_len,
                shape_i64.as_ptr(),
                shape_i64.len(),
                T::element_type().as_raw(),
                &mut value as *mut _,
            )
        };
        unsafe { (onnx.release_memory_info)(memory_info) };
        unsafe { error::check_status(onnx.api, status)? };

        Ok(Value {
            onnx: Arc::clone(onnx),
            value,
            _data: Some(Box::new(data)),
        })
    }

    /// Copy `data` into a new tensor of `shape`
    pub fn from_slice<T: TensorElement>(onnx: &Arc<Onnx>, shape: &[usize], data: &[T]) -> Result<Self> {
        Self::from_vec(onnx, shape, data.to_vec())
    }

    /// Take ownership of a value allocated by the runtime
    ///
    /// # Safety
    /// `value` must be a valid OrtValue that nothing else releases.
    pub(crate) unsafe fn from_raw(onnx: &Arc<Onnx>, value: *mut ffi::OrtValue) -> Self {
        Value {
            onnx: Arc::clone(onnx),
            value,
            _data: None,
        }
    }

    pub(crate) fn as_ptr(&self) -> *const ffi::OrtValue {
        self.value
    }

    /// Whether this value is a dense tensor (as opposed to a sequence, map, ...)
    pub fn is_tensor(&self) -> Result<bool> {
        let mut out: c_int = 0;
        let status = unsafe { (self.onnx.is_tensor)(self.value, &mut out as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        Ok(out != 0)
    }

    pub fn element_type(&self) -> Result<ElementType> {
        self.with_type_and_shape(|onnx, info| {
            let mut raw: c_int = 0;
            let status = unsafe { (onnx.get_tensor_element_type)(info, &mut raw as *mut _) };
            unsafe { error::check_status(onnx.api, status)? };
            ElementType::from_raw(raw)
                .ok_or_else(|| OnnxError::runtime_error(format!("Unknown tensor element type {}", raw)))
        })
    }

    pub fn shape(&self) -> Result<Vec<i64>> {
        self.with_type_and_shape(|onnx, info| {
            let mut dim_count: usize = 0;
            let status = unsafe { (onnx.get_dimensions_count)(info, &mut dim_count as *mut _) };
            unsafe { error::check_status(onnx.api, status)? };
            let mut dims = vec![0i64; dim_count];
            let status = unsafe { (onnx.get_dimensions)(info, dims.as_mut_ptr(), dim_count) };
            unsafe { error::check_status(onnx.api, status)? };
            Ok(dims)
        })
    }

    /// Number of elements, from the tensor's own shape
    pub fn element_count(&self) -> Result<usize> {
        self.with_type_and_shape(|onnx, info| {
            let mut count: usize = 0;
            let status = unsafe { (onnx.get_tensor_shape_element_count)(info, &mut count as *mut _) };
            unsafe { error::check_status(onnx.api, status)? };
            Ok(count)
        })
    }

    pub fn extract_tensor<T: TensorElement>(&self) -> Result<&[T]> {
        let element_type = self.element_type()?;
        if element_type != T::element_type() {
            return Err(OnnxError::runtime_error(format!(
                "Element type mismatch: expected {:?}, got {:?}",
                T::element_type(),
                element_type
            )));
        }
        let count = self.element_count()?;
        unsafe { self.raw_data::<T>(count) }
    }

    /// Bools are read as bytes; anything non-zero is true
    pub fn extract_bool(&self) -> Result<Vec<bool>> {
        let element_type = self.element_type()?;
        if element_type != ElementType::Bool {
            return Err(OnnxError::runtime_error(format!(
                "Element type mismatch: expected Bool, got {:?}",
                element_type
            )));
        }
        let count = self.element_count()?;
        let bytes = unsafe { self.raw_data::<u8>(count)? };
        Ok(bytes.iter().map(|&b| b != 0).collect())
    }

    /// Float and float16 tensors as f32
    pub fn extract_as_f32(&self) -> Result<Vec<f32>> {
        match self.element_type()? {
            ElementType::Float => Ok(self.extract_tensor::<f32>()?.to_vec()),
            ElementType::Float16 => {
                let count = self.element_count()?;
                let halves = unsafe { self.raw_data::<u16>(count)? };
                Ok(halves.iter().map(|&h| f16::f16_to_f32(h)).collect())
            }
            other => Err(OnnxError::runtime_error(format!(
                "extract_as_f32: unsupported element type {:?}",
                other
            ))),
        }
    }

    // Safety: T must have the size of the tensor's element type.
    unsafe fn raw_data<T>(&self, count: usize) -> Result<&[T]> {
        if count == 0 {
            return Ok(&[]);
        }
        let mut data_ptr: *mut c_void = null_mut();
        let status = unsafe { (self.onnx.get_tensor_mutable_data)(self.value, &mut data_ptr as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        if data_ptr.is_null() {
            return Err(OnnxError::runtime_error("Tensor has no data"));
        }
        Ok(unsafe { std::slice::from_raw_parts(data_ptr as *const T, count) })
    }

    fn with_type_and_shape<R>(
        &self,
        f: impl FnOnce(&Onnx, *const ffi::OrtTensorTypeAndShapeInfo) -> Result<R>,
    ) -> Result<R> {
        let mut info: *mut ffi::OrtTensorTypeAndShapeInfo = null_mut();
        let status = unsafe { (self.onnx.get_tensor_type_and_shape)(self.value, &mut info as *mut _) };
        unsafe { error::check_status(self.onnx.api, status)? };
        let result = f(self.onnx.as_ref(), info);
        unsafe { (self.onnx.release_tensor_type_and_shape_info)(info) };
        result
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        if !self.value.is_null() {
            unsafe { (self.onnx.release_value)(self.value) };
        }
    }
}
