use std::ffi::{c_char, c_int, c_void};

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            /// Opaque runtime handle, only ever used behind a pointer
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque! {
    OrtEnv,
    OrtSession,
    OrtSessionOptions,
    OrtValue,
    OrtStatus,
    OrtMemoryInfo,
    OrtAllocator,
    OrtRunOptions,
    OrtTensorTypeAndShapeInfo,
    OrtTypeInfo,
    OrtApi,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtLoggingLevel {
    Verbose = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtMemType {
    CpuInput = -2,
    CpuOutput = -1,
    Default = 0,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrtAllocatorType {
    Invalid = -1,
    Device = 0,
    Arena = 1,
}

#[repr(C)]
#[allow(non_snake_case)]
pub struct OrtApiBase {
    pub GetApi: unsafe extern "C" fn(version: u32) -> *const OrtApi,
    pub GetVersionString: unsafe extern "C" fn() -> *const c_char,
}

unsafe impl Send for OrtApiBase {}

// the function table is immutable once handed out
unsafe impl Send for OrtApi {}
unsafe impl Sync for OrtApi {}

unsafe extern "C" {
    pub fn OrtGetApiBase() -> *const OrtApiBase;
}

// Enumerations coming back from the runtime are read as plain integers and
// decoded on the Rust side. A fuzzed model can carry codes this binding has
// never heard of.
pub type GetErrorCodeFn = unsafe extern "C" fn(status: *const OrtStatus) -> c_int;
pub type GetErrorMessageFn = unsafe extern "C" fn(status: *const OrtStatus) -> *const c_char;
pub type ReleaseStatusFn = unsafe extern "C" fn(status: *mut OrtStatus);
pub type CreateEnvFn = unsafe extern "C" fn(
    log_level: OrtLoggingLevel,
    log_id: *const c_char,
    out: *mut *mut OrtEnv,
) -> *mut OrtStatus;
pub type ReleaseEnvFn = unsafe extern "C" fn(env: *mut OrtEnv);
pub type EnableTelemetryEventsFn = unsafe extern "C" fn(env: *const OrtEnv) -> *mut OrtStatus;
pub type GetAllocatorWithDefaultOptionsFn =
    unsafe extern "C" fn(out: *mut *mut OrtAllocator) -> *mut OrtStatus;
pub type AllocatorFreeFn =
    unsafe extern "C" fn(allocator: *mut OrtAllocator, ptr: *mut c_void) -> *mut OrtStatus;

pub type CreateSessionOptionsFn =
    unsafe extern "C" fn(out: *mut *mut OrtSessionOptions) -> *mut OrtStatus;
pub type ReleaseSessionOptionsFn = unsafe extern "C" fn(options: *mut OrtSessionOptions);
pub type AddSessionConfigEntryFn = unsafe extern "C" fn(
    options: *mut OrtSessionOptions,
    config_key: *const c_char,
    config_value: *const c_char,
) -> *mut OrtStatus;

pub type CreateSessionFn = unsafe extern "C" fn(
    env: *const OrtEnv,
    model_path: *const c_char,
    options: *const OrtSessionOptions,
    out: *mut *mut OrtSession,
) -> *mut OrtStatus;
pub type CreateSessionFromArrayFn = unsafe extern "C" fn(
    env: *const OrtEnv,
    model_data: *const c_void,
    model_data_length: usize,
    options: *const OrtSessionOptions,
    out: *mut *mut OrtSession,
) -> *mut OrtStatus;
pub type ReleaseSessionFn = unsafe extern "C" fn(session: *mut OrtSession);
pub type RunFn = unsafe extern "C" fn(
    session: *mut OrtSession,
    run_options: *const OrtRunOptions,
    input_names: *const *const c_char,
    inputs: *const *const OrtValue,
    input_len: usize,
    output_names: *const *const c_char,
    output_names_len: usize,
    outputs: *mut *mut OrtValue,
) -> *mut OrtStatus;

pub type SessionGetCountFn =
    unsafe extern "C" fn(session: *const OrtSession, out: *mut usize) -> *mut OrtStatus;
pub type SessionGetNameFn = unsafe extern "C" fn(
    session: *const OrtSession,
    index: usize,
    allocator: *mut OrtAllocator,
    value: *mut *mut c_char,
) -> *mut OrtStatus;
pub type SessionGetTypeInfoFn = unsafe extern "C" fn(
    session: *const OrtSession,
    index: usize,
    type_info: *mut *mut OrtTypeInfo,
) -> *mut OrtStatus;

pub type ReleaseTypeInfoFn = unsafe extern "C" fn(info: *mut OrtTypeInfo);
pub type GetOnnxTypeFromTypeInfoFn =
    unsafe extern "C" fn(type_info: *const OrtTypeInfo, out: *mut c_int) -> *mut OrtStatus;
pub type CastTypeInfoToTensorInfoFn = unsafe extern "C" fn(
    type_info: *const OrtTypeInfo,
    out: *mut *const OrtTensorTypeAndShapeInfo,
) -> *mut OrtStatus;
pub type GetTensorElementTypeFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    out: *mut c_int,
) -> *mut OrtStatus;
pub type GetDimensionsCountFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    out: *mut usize,
) -> *mut OrtStatus;
pub type GetDimensionsFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    dim_values: *mut i64,
    dim_count: usize,
) -> *mut OrtStatus;
pub type GetTensorShapeElementCountFn = unsafe extern "C" fn(
    info: *const OrtTensorTypeAndShapeInfo,
    out: *mut usize,
) -> *mut OrtStatus;
pub type ReleaseTensorTypeAndShapeInfoFn =
    unsafe extern "C" fn(info: *mut OrtTensorTypeAndShapeInfo);

pub type CreateCpuMemoryInfoFn = unsafe extern "C" fn(
    allocator_type: OrtAllocatorType,
    mem_type: OrtMemType,
    out: *mut *mut OrtMemoryInfo,
) -> *mut OrtStatus;
pub type ReleaseMemoryInfoFn = unsafe extern "C" fn(info: *mut OrtMemoryInfo);
pub type CreateTensorWithDataAsOrtValueFn = unsafe extern "C" fn(
    memory_info: *const OrtMemoryInfo,
    data: *mut c_void,
    data_len: usize,
    shape: *const i64,
    shape_len: usize,
    element_type: c_int,
    out: *mut *mut OrtValue,
) -> *mut OrtStatus;
pub type IsTensorFn = unsafe extern "C" fn(value: *const OrtValue, out: *mut c_int) -> *mut OrtStatus;
pub type GetTensorMutableDataFn =
    unsafe extern "C" fn(value: *mut OrtValue, out: *mut *mut c_void) -> *mut OrtStatus;
pub type GetTensorTypeAndShapeFn = unsafe extern "C" fn(
    value: *const OrtValue,
    out: *mut *mut OrtTensorTypeAndShapeInfo,
) -> *mut OrtStatus;
pub type ReleaseValueFn = unsafe extern "C" fn(value: *mut OrtValue);

// OrtApi vtable indices, taken from onnxruntime_c_api.h. Entries are only
// ever appended, so these stay valid for every API version >= the one that
// introduced them (AddSessionConfigEntry arrived with version 4).
pub const IDX_GET_ERROR_CODE: usize = 1;
pub const IDX_GET_ERROR_MESSAGE: usize = 2;
pub const IDX_CREATE_ENV: usize = 3;
pub const IDX_ENABLE_TELEMETRY_EVENTS: usize = 5;
pub const IDX_CREATE_SESSION: usize = 7;
pub const IDX_CREATE_SESSION_FROM_ARRAY: usize = 8;
pub const IDX_RUN: usize = 9;
pub const IDX_CREATE_SESSION_OPTIONS: usize = 10;
pub const IDX_SESSION_GET_INPUT_COUNT: usize = 30;
pub const IDX_SESSION_GET_OUTPUT_COUNT: usize = 31;
pub const IDX_SESSION_GET_INPUT_TYPE_INFO: usize = 33;
pub const IDX_SESSION_GET_OUTPUT_TYPE_INFO: usize = 34;
pub const IDX_SESSION_GET_INPUT_NAME: usize = 36;
pub const IDX_SESSION_GET_OUTPUT_NAME: usize = 37;
pub const IDX_CREATE_TENSOR_WITH_DATA_AS_ORT_VALUE: usize = 49;
pub const IDX_IS_TENSOR: usize = 50;
pub const IDX_GET_TENSOR_MUTABLE_DATA: usize = 51;
pub const IDX_CAST_TYPE_INFO_TO_TENSOR_INFO: usize = 55;
pub const IDX_GET_ONNX_TYPE_FROM_TYPE_INFO: usize = 56;
pub const IDX_GET_TENSOR_ELEMENT_TYPE: usize = 60;
pub const IDX_GET_DIMENSIONS_COUNT: usize = 61;
pub const IDX_GET_DIMENSIONS: usize = 62;
pub const IDX_GET_TENSOR_SHAPE_ELEMENT_COUNT: usize = 64;
pub const IDX_GET_TENSOR_TYPE_AND_SHAPE: usize = 65;
pub const IDX_CREATE_CPU_MEMORY_INFO: usize = 69;
pub const IDX_ALLOCATOR_FREE: usize = 76;
pub const IDX_GET_ALLOCATOR_WITH_DEFAULT_OPTIONS: usize = 78;
pub const IDX_RELEASE_ENV: usize = 92;
pub const IDX_RELEASE_STATUS: usize = 93;
pub const IDX_RELEASE_MEMORY_INFO: usize = 94;
pub const IDX_RELEASE_SESSION: usize = 95;
pub const IDX_RELEASE_VALUE: usize = 96;
pub const IDX_RELEASE_TYPE_INFO: usize = 98;
pub const IDX_RELEASE_TENSOR_TYPE_AND_SHAPE_INFO: usize = 99;
pub const IDX_RELEASE_SESSION_OPTIONS: usize = 100;
pub const IDX_ADD_SESSION_CONFIG_ENTRY: usize = 130;

/// Config key selecting the serialized format a session loads from.
pub const LOAD_MODEL_FORMAT_KEY: &str = "session.load_model_format";

impl OrtApi {
    /// Read entry `index` of the API vtable as a function pointer of type `F`.
    ///
    /// # Safety
    /// `F` must be the exact function pointer type stored at `index`.
    pub unsafe fn get_fn<F>(&self, index: usize) -> F {
        unsafe {
            let vtable = self as *const _ as *const *const ();
            let fn_ptr = *vtable.add(index);
            std::mem::transmute_copy(&fn_ptr)
        }
    }
}
