//! Extract probe metadata from a parsed HEAD response.

use super::HeadResult;
use crate::http::HttpResponse;

pub(crate) fn head_result(response: &HttpResponse) -> HeadResult {
    HeadResult {
        status_code: response.status_code,
        content_length: response.content_length(),
        accept_ranges: response.accepts_ranges(),
    }
}
