use {
    crate::*,
    std::{
        ffi::{CString, c_void},
        path::Path,
        ptr::null_mut,
        sync::Arc,
    },
};

/// C API version requested when none is configured
pub const DEFAULT_API_VERSION: u32 = 17;

/// Serialized format a session is told to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelFormat {
    /// Protobuf ONNX interchange format
    Onnx,
    /// Flatbuffer ORT format (pre-optimized models)
    #[default]
    Ort,
}

impl ModelFormat {
    pub fn config_value(&self) -> &'static str {
        match self {
            ModelFormat::Onnx => "ONNX",
            ModelFormat::Ort => "ORT",
        }
    }
}

/// Per-session load configuration
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    format: Option<ModelFormat>,
}

impl SessionOptions {
    /// Pin the loader to one serialized format instead of letting it sniff the bytes
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn format(&self) -> Option<ModelFormat> {
        self.format
    }
}

/// Process-wide runtime state: API table, environment and default allocator
#[derive(Debug)]
pub struct Onnx {
    pub(crate) api: *const ffi::OrtApi,
    pub(crate) environment: *mut ffi::OrtEnv,
    pub(crate) allocator: *mut ffi::OrtAllocator,
    pub(crate) allocator_free: ffi::AllocatorFreeFn,
    pub(crate) enable_telemetry_events: ffi::EnableTelemetryEventsFn,
    pub(crate) create_session: ffi::CreateSessionFn,
    pub(crate) create_session_from_array: ffi::CreateSessionFromArrayFn,
    pub(crate) create_session_options: ffi::CreateSessionOptionsFn,
    pub(crate) add_session_config_entry: ffi::AddSessionConfigEntryFn,
    pub(crate) release_session_options: ffi::ReleaseSessionOptionsFn,
    pub(crate) session_get_input_count: ffi::SessionGetCountFn,
    pub(crate) session_get_output_count: ffi::SessionGetCountFn,
    pub(crate) session_get_input_name: ffi::SessionGetNameFn,
    pub(crate) session_get_output_name: ffi::SessionGetNameFn,
    pub(crate) session_get_input_type_info: ffi::SessionGetTypeInfoFn,
    pub(crate) session_get_output_type_info: ffi::SessionGetTypeInfoFn,
    pub(crate) release_type_info: ffi::ReleaseTypeInfoFn,
    pub(crate) get_onnx_type_from_type_info: ffi::GetOnnxTypeFromTypeInfoFn,
    pub(crate) cast_type_info_to_tensor_info: ffi::CastTypeInfoToTensorInfoFn,
    pub(crate) get_dimensions_count: ffi::GetDimensionsCountFn,
    pub(crate) get_dimensions: ffi::GetDimensionsFn,
    pub(crate) get_tensor_element_type: ffi::GetTensorElementTypeFn,
    pub(crate) get_tensor_shape_element_count: ffi::GetTensorShapeElementCountFn,
    pub(crate) run: ffi::RunFn,
    pub(crate) release_session: ffi::ReleaseSessionFn,
    pub(crate) create_memory_info: ffi::CreateCpuMemoryInfoFn,
    pub(crate) release_memory_info: ffi::ReleaseMemoryInfoFn,
    pub(crate) create_tensor: ffi::CreateTensorWithDataAsOrtValueFn,
    pub(crate) is_tensor: ffi::IsTensorFn,
    pub(crate) get_tensor_type_and_shape: ffi::GetTensorTypeAndShapeFn,
    pub(crate) release_tensor_type_and_shape_info: ffi::ReleaseTensorTypeAndShapeInfoFn,
    pub(crate) get_tensor_mutable_data: ffi::GetTensorMutableDataFn,
    pub(crate) release_value: ffi::ReleaseValueFn,
    release_env: ffi::ReleaseEnvFn,
}

unsafe impl Send for Onnx {}
unsafe impl Sync for Onnx {}

impl Onnx {
    /// Resolve the C API at `version`, create the environment and fetch the default allocator
    pub fn new(version: u32) -> Result<Arc<Self>> {
        let api_base = unsafe { ffi::OrtGetApiBase() };
        if api_base.is_null() {
            return Err(OnnxError::runtime_error("Failed to get ONNX Runtime API base"));
        }

        let get_api = unsafe { (*api_base).GetApi };
        let api = unsafe { get_api(version) };
        if api.is_null() {
            return Err(OnnxError::runtime_error(format!(
                "ONNX Runtime doesn't support API version {}. Your runtime may be too old.",
                version
            )));
        }
        let table = unsafe { &*api };

        let create_env: ffi::CreateEnvFn = unsafe { table.get_fn(ffi::IDX_CREATE_ENV) };
        let release_env: ffi::ReleaseEnvFn = unsafe { table.get_fn(ffi::IDX_RELEASE_ENV) };
        let log_id = CString::new("onnx").map_err(|_| OnnxError::runtime_error("Null byte in log id"))?;
        let mut environment: *mut ffi::OrtEnv = null_mut();
        let status = unsafe {
            create_env(
                ffi::OrtLoggingLevel::Warning,
                log_id.as_ptr(),
                &mut environment as *mut _,
            )
        };
        unsafe { error::check_status(api, status)? };

        let get_allocator: ffi::GetAllocatorWithDefaultOptionsFn =
            unsafe { table.get_fn(ffi::IDX_GET_ALLOCATOR_WITH_DEFAULT_OPTIONS) };
        let mut allocator: *mut ffi::OrtAllocator = null_mut();
        let status = unsafe { get_allocator(&mut allocator as *mut _) };
        if let Err(err) = unsafe { error::check_status(api, status) } {
            unsafe { release_env(environment) };
            return Err(err);
        }

        unsafe {
            Ok(Arc::new(Self {
                api,
                environment,
                allocator,
                allocator_free: table.get_fn(ffi::IDX_ALLOCATOR_FREE),
                enable_telemetry_events: table.get_fn(ffi::IDX_ENABLE_TELEMETRY_EVENTS),
                create_session: table.get_fn(ffi::IDX_CREATE_SESSION),
                create_session_from_array: table.get_fn(ffi::IDX_CREATE_SESSION_FROM_ARRAY),
                create_session_options: table.get_fn(ffi::IDX_CREATE_SESSION_OPTIONS),
                add_session_config_entry: table.get_fn(ffi::IDX_ADD_SESSION_CONFIG_ENTRY),
                release_session_options: table.get_fn(ffi::IDX_RELEASE_SESSION_OPTIONS),
                session_get_input_count: table.get_fn(ffi::IDX_SESSION_GET_INPUT_COUNT),
                session_get_output_count: table.get_fn(ffi::IDX_SESSION_GET_OUTPUT_COUNT),
                session_get_input_name: table.get_fn(ffi::IDX_SESSION_GET_INPUT_NAME),
                session_get_output_name: table.get_fn(ffi::IDX_SESSION_GET_OUTPUT_NAME),
                session_get_input_type_info: table.get_fn(ffi::IDX_SESSION_GET_INPUT_TYPE_INFO),
                session_get_output_type_info: table.get_fn(ffi::IDX_SESSION_GET_OUTPUT_TYPE_INFO),
                release_type_info: table.get_fn(ffi::IDX_RELEASE_TYPE_INFO),
                get_onnx_type_from_type_info: table.get_fn(ffi::IDX_GET_ONNX_TYPE_FROM_TYPE_INFO),
                cast_type_info_to_tensor_info: table.get_fn(ffi::IDX_CAST_TYPE_INFO_TO_TENSOR_INFO),
                get_dimensions_count: table.get_fn(ffi::IDX_GET_DIMENSIONS_COUNT),
                get_dimensions: table.get_fn(ffi::IDX_GET_DIMENSIONS),
                get_tensor_element_type: table.get_fn(ffi::IDX_GET_TENSOR_ELEMENT_TYPE),
                get_tensor_shape_element_count: table
                    .get_fn(ffi::IDX_GET_TENSOR_SHAPE_ELEMENT_COUNT),
                run: table.get_fn(ffi::IDX_RUN),
                release_session: table.get_fn(ffi::IDX_RELEASE_SESSION),
                create_memory_info: table.get_fn(ffi::IDX_CREATE_CPU_MEMORY_INFO),
                release_memory_info: table.get_fn(ffi::IDX_RELEASE_MEMORY_INFO),
                create_tensor: table.get_fn(ffi::IDX_CREATE_TENSOR_WITH_DATA_AS_ORT_VALUE),
                is_tensor: table.get_fn(ffi::IDX_IS_TENSOR),
                get_tensor_type_and_shape: table.get_fn(ffi::IDX_GET_TENSOR_TYPE_AND_SHAPE),
                release_tensor_type_and_shape_info: table
                    .get_fn(ffi::IDX_RELEASE_TENSOR_TYPE_AND_SHAPE_INFO),
                get_tensor_mutable_data: table.get_fn(ffi::IDX_GET_TENSOR_MUTABLE_DATA),
                release_value: table.get_fn(ffi::IDX_RELEASE_VALUE),
                release_env,
            }))
        }
    }

    /// Turn on the runtime's telemetry hook for this environment
    pub fn enable_telemetry_events(&self) -> Result<()> {
        let status = unsafe { (self.enable_telemetry_events)(self.environment) };
        unsafe { error::check_status(self.api, status) }
    }

    /// Load a model from a file on disk
    pub fn create_session_from_file(
        self: &Arc<Self>,
        model_path: impl AsRef<Path>,
        options: &SessionOptions,
    ) -> Result<Session> {
        let path_str = model_path
            .as_ref()
            .to_str()
            .ok_or_else(|| OnnxError::runtime_error("Invalid UTF-8 in model path"))?;
        let c_path = CString::new(path_str)
            .map_err(|_| OnnxError::runtime_error("Null byte in model path"))?;

        let native = self.native_options(options)?;
        let mut session: *mut ffi::OrtSession = null_mut();
        let status = unsafe {
            (self.create_session)(
                self.environment,
                c_path.as_ptr(),
                native.ptr,
                &mut session as *mut _,
            )
        };
        unsafe { error::check_status(self.api, status)? };

        Ok(Session::from_raw(self, session))
    }

    /// Load a model from serialized bytes
    ///
    /// The runtime may keep referring to `model_data` for ORT-format models, so the
    /// caller keeps the buffer alive for as long as the session.
    pub fn create_session_from_memory(
        self: &Arc<Self>,
        model_data: &[u8],
        options: &SessionOptions,
    ) -> Result<Session> {
        let native = self.native_options(options)?;
        let mut session: *mut ffi::OrtSession = null_mut();
        let status = unsafe {
            (self.create_session_from_array)(
                self.environment,
                model_data.as_ptr() as *const c_void,
                model_data.len(),
                native.ptr,
                &mut session as *mut _,
            )
        };
        unsafe { error::check_status(self.api, status)? };

        Ok(Session::from_raw(self, session))
    }

    fn native_options(&self, options: &SessionOptions) -> Result<NativeOptions<'_>> {
        let mut ptr: *mut ffi::OrtSessionOptions = null_mut();
        let status = unsafe { (self.create_session_options)(&mut ptr as *mut _) };
        unsafe { error::check_status(self.api, status)? };
        let native = NativeOptions { onnx: self, ptr };

        if let Some(format) = options.format() {
            let key = CString::new(ffi::LOAD_MODEL_FORMAT_KEY)
                .map_err(|_| OnnxError::runtime_error("Null byte in config key"))?;
            let value = CString::new(format.config_value())
                .map_err(|_| OnnxError::runtime_error("Null byte in config value"))?;
            let status =
                unsafe { (self.add_session_config_entry)(native.ptr, key.as_ptr(), value.as_ptr()) };
            unsafe { error::check_status(self.api, status)? };
        }

        Ok(native)
    }
}

impl Drop for Onnx {
    fn drop(&mut self) {
        if !self.environment.is_null() {
            unsafe { (self.release_env)(self.environment) };
        }
    }
}

// Session options only need to outlive the create call.
struct NativeOptions<'a> {
    onnx: &'a Onnx,
    ptr: *mut ffi::OrtSessionOptions,
}

impl Drop for NativeOptions<'_> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.onnx.release_session_options)(self.ptr) };
        }
    }
}
