//! wav2vec2 encoder with a sequence-classification head, built on candle-nn
//! primitives and loaded from Hugging Face safetensors checkpoints.
//!
//! Implements the post-layer-norm encoder variant used by the base and
//! telephony fine-tuned checkpoints (`do_stable_layer_norm = false`).

use std::collections::HashMap;

use candle_core::{Result, Tensor};
use candle_nn::{
    conv1d, conv1d_no_bias, group_norm, layer_norm, linear, Conv1d, Conv1dConfig, GroupNorm,
    LayerNorm, Linear, Module, VarBuilder,
};
use serde::Deserialize;

fn default_layer_norm_eps() -> f64 {
    1e-5
}

fn default_feat_extract_norm() -> String {
    "group".to_string()
}

fn default_classifier_proj_size() -> usize {
    256
}

/// Subset of the Hugging Face `config.json` needed for inference.
#[derive(Debug, Clone, Deserialize)]
pub struct Wav2Vec2Config {
    pub hidden_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    pub conv_dim: Vec<usize>,
    pub conv_kernel: Vec<usize>,
    pub conv_stride: Vec<usize>,
    #[serde(default)]
    pub conv_bias: bool,
    pub num_conv_pos_embeddings: usize,
    pub num_conv_pos_embedding_groups: usize,
    #[serde(default = "default_feat_extract_norm")]
    pub feat_extract_norm: String,
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
    #[serde(default = "default_classifier_proj_size")]
    pub classifier_proj_size: usize,
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,
}

impl Wav2Vec2Config {
    /// Number of output classes; binary human/machine when the checkpoint
    /// does not declare a label map.
    pub fn num_labels(&self) -> usize {
        match &self.id2label {
            Some(labels) if !labels.is_empty() => labels.len(),
            _ => 2,
        }
    }
}

/// One strided convolution of the feature encoder. The first layer of
/// group-norm checkpoints carries a GroupNorm stored under `layer_norm`.
struct ConvLayer {
    conv: Conv1d,
    norm: Option<GroupNorm>,
}

impl ConvLayer {
    fn load(
        in_dim: usize,
        out_dim: usize,
        kernel: usize,
        stride: usize,
        with_group_norm: bool,
        cfg: &Wav2Vec2Config,
        vb: VarBuilder,
    ) -> Result<Self> {
        let conv_cfg = Conv1dConfig {
            stride,
            ..Default::default()
        };
        let conv = if cfg.conv_bias {
            conv1d(in_dim, out_dim, kernel, conv_cfg, vb.pp("conv"))?
        } else {
            conv1d_no_bias(in_dim, out_dim, kernel, conv_cfg, vb.pp("conv"))?
        };
        let norm = if with_group_norm {
            Some(group_norm(
                out_dim,
                out_dim,
                cfg.layer_norm_eps,
                vb.pp("layer_norm"),
            )?)
        } else {
            None
        };
        Ok(Self { conv, norm })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.conv.forward(xs)?;
        let xs = match &self.norm {
            Some(norm) => norm.forward(&xs)?,
            None => xs,
        };
        xs.gelu_erf()
    }
}

/// Stack of strided convolutions turning raw waveform into latent frames at
/// roughly 49 Hz.
struct FeatureEncoder {
    layers: Vec<ConvLayer>,
}

impl FeatureEncoder {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let vb = vb.pp("conv_layers");
        let group_norm_first = cfg.feat_extract_norm == "group";
        let mut layers = Vec::with_capacity(cfg.conv_dim.len());
        for i in 0..cfg.conv_dim.len() {
            let in_dim = if i == 0 { 1 } else { cfg.conv_dim[i - 1] };
            layers.push(ConvLayer::load(
                in_dim,
                cfg.conv_dim[i],
                cfg.conv_kernel[i],
                cfg.conv_stride[i],
                group_norm_first && i == 0,
                cfg,
                vb.pp(i),
            )?);
        }
        Ok(Self { layers })
    }

    fn forward(&self, input_values: &Tensor) -> Result<Tensor> {
        // (batch, samples) -> (batch, 1, samples)
        let mut xs = input_values.unsqueeze(1)?;
        for layer in &self.layers {
            xs = layer.forward(&xs)?;
        }
        Ok(xs)
    }
}

struct FeatureProjection {
    layer_norm: LayerNorm,
    projection: Linear,
}

impl FeatureProjection {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let last_conv_dim = *cfg.conv_dim.last().unwrap_or(&cfg.hidden_size);
        Ok(Self {
            layer_norm: layer_norm(last_conv_dim, cfg.layer_norm_eps, vb.pp("layer_norm"))?,
            projection: linear(last_conv_dim, cfg.hidden_size, vb.pp("projection"))?,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.projection.forward(&self.layer_norm.forward(xs)?)
    }
}

/// Grouped convolution producing relative positional embeddings. The
/// checkpoint stores the kernel weight-normalized as `weight_g`/`weight_v`.
struct PositionalConvEmbedding {
    conv: Conv1d,
    trim_tail: usize,
}

impl PositionalConvEmbedding {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let vb = vb.pp("conv");
        let hidden = cfg.hidden_size;
        let kernel = cfg.num_conv_pos_embeddings;
        let groups = cfg.num_conv_pos_embedding_groups;

        let weight_v = vb.get((hidden, hidden / groups, kernel), "weight_v")?;
        let weight_g = vb.get((1, 1, kernel), "weight_g")?;
        // weight_norm with dim=2: per-kernel-position norm over the channel dims
        let norm = weight_v
            .sqr()?
            .sum_keepdim(0)?
            .sum_keepdim(1)?
            .sqrt()?;
        let weight = weight_v.broadcast_div(&norm)?.broadcast_mul(&weight_g)?;
        let bias = vb.get(hidden, "bias")?;

        let conv_cfg = Conv1dConfig {
            padding: kernel / 2,
            groups,
            ..Default::default()
        };

        Ok(Self {
            conv: Conv1d::new(weight, Some(bias), conv_cfg),
            // Even kernels overshoot the sequence length by one frame
            trim_tail: if kernel % 2 == 0 { 1 } else { 0 },
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = xs.transpose(1, 2)?;
        let xs = self.conv.forward(&xs)?;
        let xs = if self.trim_tail > 0 {
            let len = xs.dim(2)?;
            xs.narrow(2, 0, len - self.trim_tail)?
        } else {
            xs
        };
        xs.gelu_erf()?.transpose(1, 2)
    }
}

struct Attention {
    q_proj: Linear,
    k_proj: Linear,
    v_proj: Linear,
    out_proj: Linear,
    num_heads: usize,
    head_dim: usize,
    scaling: f64,
}

impl Attention {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let hidden = cfg.hidden_size;
        let head_dim = hidden / cfg.num_attention_heads;
        Ok(Self {
            q_proj: linear(hidden, hidden, vb.pp("q_proj"))?,
            k_proj: linear(hidden, hidden, vb.pp("k_proj"))?,
            v_proj: linear(hidden, hidden, vb.pp("v_proj"))?,
            out_proj: linear(hidden, hidden, vb.pp("out_proj"))?,
            num_heads: cfg.num_attention_heads,
            head_dim,
            scaling: (head_dim as f64).powf(-0.5),
        })
    }

    fn split_heads(&self, xs: &Tensor, b: usize, t: usize) -> Result<Tensor> {
        xs.reshape((b, t, self.num_heads, self.head_dim))?
            .transpose(1, 2)?
            .contiguous()
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (b, t, hidden) = xs.dims3()?;

        let q = self.q_proj.forward(xs)?.affine(self.scaling, 0.0)?;
        let q = self.split_heads(&q, b, t)?;
        let k = self.split_heads(&self.k_proj.forward(xs)?, b, t)?;
        let v = self.split_heads(&self.v_proj.forward(xs)?, b, t)?;

        let scores = q.matmul(&k.transpose(2, 3)?)?;
        let weights = candle_nn::ops::softmax_last_dim(&scores)?;
        let context = weights.matmul(&v)?;

        let context = context
            .transpose(1, 2)?
            .contiguous()?
            .reshape((b, t, hidden))?;
        self.out_proj.forward(&context)
    }
}

struct FeedForward {
    intermediate_dense: Linear,
    output_dense: Linear,
}

impl FeedForward {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            intermediate_dense: linear(
                cfg.hidden_size,
                cfg.intermediate_size,
                vb.pp("intermediate_dense"),
            )?,
            output_dense: linear(
                cfg.intermediate_size,
                cfg.hidden_size,
                vb.pp("output_dense"),
            )?,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.intermediate_dense.forward(xs)?.gelu_erf()?;
        self.output_dense.forward(&xs)
    }
}

/// Post-layer-norm transformer layer.
struct EncoderLayer {
    attention: Attention,
    layer_norm: LayerNorm,
    feed_forward: FeedForward,
    final_layer_norm: LayerNorm,
}

impl EncoderLayer {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            attention: Attention::load(cfg, vb.pp("attention"))?,
            layer_norm: layer_norm(cfg.hidden_size, cfg.layer_norm_eps, vb.pp("layer_norm"))?,
            feed_forward: FeedForward::load(cfg, vb.pp("feed_forward"))?,
            final_layer_norm: layer_norm(
                cfg.hidden_size,
                cfg.layer_norm_eps,
                vb.pp("final_layer_norm"),
            )?,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let residual = xs;
        let xs = self.attention.forward(xs)?;
        let xs = self.layer_norm.forward(&(residual + xs)?)?;
        let xs = (&xs + self.feed_forward.forward(&xs)?)?;
        self.final_layer_norm.forward(&xs)
    }
}

struct Encoder {
    pos_conv_embed: PositionalConvEmbedding,
    layer_norm: LayerNorm,
    layers: Vec<EncoderLayer>,
}

impl Encoder {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let layers_vb = vb.pp("layers");
        let layers = (0..cfg.num_hidden_layers)
            .map(|i| EncoderLayer::load(cfg, layers_vb.pp(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pos_conv_embed: PositionalConvEmbedding::load(cfg, vb.pp("pos_conv_embed"))?,
            layer_norm: layer_norm(cfg.hidden_size, cfg.layer_norm_eps, vb.pp("layer_norm"))?,
            layers,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let pos = self.pos_conv_embed.forward(xs)?;
        let mut xs = self.layer_norm.forward(&(xs + pos)?)?;
        for layer in &self.layers {
            xs = layer.forward(&xs)?;
        }
        Ok(xs)
    }
}

/// wav2vec2 encoder plus mean-pooled classification head.
pub struct Wav2Vec2SequenceClassifier {
    feature_encoder: FeatureEncoder,
    feature_projection: FeatureProjection,
    encoder: Encoder,
    projector: Linear,
    classifier: Linear,
}

impl Wav2Vec2SequenceClassifier {
    pub fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let w2v = vb.pp("wav2vec2");
        Ok(Self {
            feature_encoder: FeatureEncoder::load(cfg, w2v.pp("feature_extractor"))?,
            feature_projection: FeatureProjection::load(cfg, w2v.pp("feature_projection"))?,
            encoder: Encoder::load(cfg, w2v.pp("encoder"))?,
            projector: linear(cfg.hidden_size, cfg.classifier_proj_size, vb.pp("projector"))?,
            classifier: linear(
                cfg.classifier_proj_size,
                cfg.num_labels(),
                vb.pp("classifier"),
            )?,
        })
    }

    /// `input_values`: `(batch, samples)` of normalized waveform. Returns
    /// raw logits `(batch, num_labels)`.
    pub fn forward(&self, input_values: &Tensor) -> Result<Tensor> {
        let xs = self.feature_encoder.forward(input_values)?;
        // (batch, channels, frames) -> (batch, frames, channels)
        let xs = xs.transpose(1, 2)?;
        let xs = self.feature_projection.forward(&xs)?;
        let xs = self.encoder.forward(&xs)?;
        let xs = self.projector.forward(&xs)?;
        let pooled = xs.mean(1)?;
        self.classifier.forward(&pooled)
    }
}
