mod inference_context_test;
