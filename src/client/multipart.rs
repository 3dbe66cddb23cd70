// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Minimal `multipart/form-data` body builder for frame uploads.

/// A form being encoded as `multipart/form-data`.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    /// Start a form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("framemeasure-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part(&format!("Content-Disposition: form-data; name=\"{}\"", name));
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}",
            name, filename, content_type
        ));
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the form and return `(content_type, body)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (self.content_type(), self.body)
    }

    fn open_part(&mut self, headers: &str) {
        self.body
            .extend_from_slice(format!("--{}\r\n{}\r\n\r\n", self.boundary, headers).as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_text_and_file_parts() {
        let (content_type, body) = MultipartForm::with_boundary("XYZ")
            .text("frame_idx", "42")
            .file("canvas_image", "frame_42.png", "image/png", &[1, 2, 3])
            .finish();

        assert_eq!(content_type, "multipart/form-data; boundary=XYZ");

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"frame_idx\"\r\n\r\n42\r\n",
        );
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"canvas_image\"; filename=\"frame_42.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        expected.extend_from_slice(&[1, 2, 3]);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_random_boundaries_differ() {
        assert_ne!(MultipartForm::new().content_type(), MultipartForm::new().content_type());
    }
}
