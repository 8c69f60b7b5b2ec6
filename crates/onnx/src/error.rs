use crate::{ffi, types::ErrorCode};
use std::ffi::CStr;
use std::fmt;

/// Error reported by ONNX Runtime, or by this binding around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnnxError {
    code: ErrorCode,
    message: String,
}

impl OnnxError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        OnnxError {
            code,
            message: message.into(),
        }
    }

    /// Error raised by the binding itself rather than the runtime
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RuntimeException, message)
    }

    /// Take ownership of a non-null `OrtStatus`, copy out code and message, and release it
    ///
    /// # Safety
    /// - status must be a valid non-null OrtStatus pointer
    /// - api must be a valid OrtApi pointer
    pub(crate) unsafe fn from_status(api: *const ffi::OrtApi, status: *mut ffi::OrtStatus) -> Self {
        unsafe {
            let api = &*api;

            let get_error_code: ffi::GetErrorCodeFn = api.get_fn(ffi::IDX_GET_ERROR_CODE);
            let code = ErrorCode::from_raw(get_error_code(status));

            let get_error_message: ffi::GetErrorMessageFn = api.get_fn(ffi::IDX_GET_ERROR_MESSAGE);
            let msg_ptr = get_error_message(status);
            let message = if msg_ptr.is_null() {
                String::from("Unknown error")
            } else {
                CStr::from_ptr(msg_ptr).to_string_lossy().into_owned()
            };

            let release_status: ffi::ReleaseStatusFn = api.get_fn(ffi::IDX_RELEASE_STATUS);
            release_status(status);

            OnnxError { code, message }
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for OnnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ONNX error ({:?}): {}", self.code, self.message)
    }
}

impl std::error::Error for OnnxError {}

pub type Result<T> = std::result::Result<T, OnnxError>;

/// Turn an `OrtStatus` into a `Result`; null means success
///
/// # Safety
/// - if non-null, status must be a valid OrtStatus pointer
/// - api must be a valid OrtApi pointer
pub(crate) unsafe fn check_status(api: *const ffi::OrtApi, status: *mut ffi::OrtStatus) -> Result<()> {
    if status.is_null() {
        Ok(())
    } else {
        unsafe { Err(OnnxError::from_status(api, status)) }
    }
}
