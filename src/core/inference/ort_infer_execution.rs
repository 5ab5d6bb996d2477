use super::*;
use crate::core::errors::{BanaError, OpaqueError};
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Returns the configured or discovered output tensor name.
    fn get_output_name(&self) -> BanaResult<String> {
        if let Some(ref name) = self.output_name {
            return Ok(name.clone());
        }
        let session = self.sessions[0].lock().map_err(|_| {
            BanaError::inference_message(&self.model_name, "Failed to acquire session lock")
        })?;
        session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                BanaError::inference_message(
                    &self.model_name,
                    "No outputs available in session - model may be invalid or corrupted",
                )
            })
    }

    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the input tensor name fed by this engine.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> BanaResult<T>,
    ) -> BanaResult<T> {
        let input_shape = x.shape().to_vec();
        let output_name = self.get_output_name()?;

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            BanaError::inference_error(
                &self.model_name,
                &format!("Failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            BanaError::inference_error(
                &self.model_name,
                &format!(
                    "Failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                OpaqueError("Session lock acquisition failed".to_string()),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            BanaError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime inference failed with input '{}' {:?} -> output '{}'",
                    self.input_name, input_shape, output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                BanaError::inference_error(
                    &self.model_name,
                    &format!("Failed to extract output tensor '{output_name}' as f32"),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }

    /// Runs a classification forward pass and returns `(batch, classes)` scores.
    pub fn infer_2d(&self, x: &Tensor4D) -> BanaResult<Tensor2D> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() != 2 {
                return Err(BanaError::invalid_output(format!(
                    "Model '{}' returned a {}D tensor with shape {:?}, expected (batch, classes)",
                    self.model_name,
                    output_shape.len(),
                    output_shape
                )));
            }

            let num_classes = output_shape[1] as usize;
            let expected_len = batch_size * num_classes;

            if output_data.len() != expected_len {
                return Err(BanaError::invalid_output(format!(
                    "Model '{}' output data size mismatch for input shape {:?} -> output shape {:?}: expected {}, got {}",
                    self.model_name,
                    input_shape,
                    output_shape,
                    expected_len,
                    output_data.len()
                )));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)
                .map_err(BanaError::Tensor)?;
            Ok(array_view.to_owned())
        })
    }
}
