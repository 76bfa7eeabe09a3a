//! Built-in provider catalog.
//!
//! Every supported vendor is one [`ProviderSpec`] row. Vendors differ only in
//! data: default endpoint, environment keys, wire format, listing endpoint and
//! hand-curated static models. [`Provider`](super::Provider) interprets a row.

use serde::Serialize;

/// Default environment keys a provider reads credentials from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Variable carrying the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token_key: Option<&'static str>,
    /// Variable carrying a base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url_key: Option<&'static str>,
}

/// Chat completion protocol spoken by a provider's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// `POST {base}/chat/completions` with bearer auth.
    OpenAi,
    /// `POST {base}/messages` with `x-api-key`.
    Anthropic,
    /// `POST {base}/api/chat`, no auth.
    Ollama,
}

/// Shape of a provider's model-listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelListing {
    /// `GET {base}/models` returning `{"data": [...]}`.
    OpenAi,
    /// `GET {base}/models` with Anthropic headers.
    Anthropic,
    /// `GET {base}/models` returning a bare array with a `type` per entry.
    Together,
    /// `GET {base}/api/tags`.
    Ollama,
}

/// A hand-curated model entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticModel {
    pub name: &'static str,
    pub label: &'static str,
    pub max_tokens: u32,
}

const fn model(name: &'static str, label: &'static str, max_tokens: u32) -> StaticModel {
    StaticModel {
        name,
        label,
        max_tokens,
    }
}

/// Static description of one vendor.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    /// Unique, stable provider name.
    pub name: &'static str,
    /// Environment keys for credentials.
    pub config: ProviderConfig,
    /// Vendor endpoint used when nothing overrides it. May contain `{KEY}`
    /// placeholders naming entries of `extra_keys`.
    pub default_base_url: &'static str,
    /// Where users obtain an API key.
    pub api_key_link: Option<&'static str>,
    /// Link text for `api_key_link`.
    pub label_for_get_api_key: Option<&'static str>,
    /// Whether building a model handle requires an API key.
    pub requires_api_key: bool,
    /// Additional settings that must resolve alongside the key.
    pub extra_keys: &'static [&'static str],
    /// Chat protocol.
    pub wire: WireFormat,
    /// Model-listing endpoint, if the vendor has one.
    pub listing: Option<ModelListing>,
    /// Hand-curated models.
    pub static_models: &'static [StaticModel],
}

impl ProviderSpec {
    /// Every environment key this provider reads.
    pub fn env_keys(&self) -> Vec<&'static str> {
        self.config
            .api_token_key
            .into_iter()
            .chain(self.config.base_url_key)
            .chain(self.extra_keys.iter().copied())
            .collect()
    }
}

/// Built-in providers in registration order. The first is the default.
pub const CATALOG: &[ProviderSpec] = &[
    ProviderSpec {
        name: "Anthropic",
        config: ProviderConfig {
            api_token_key: Some("ANTHROPIC_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.anthropic.com/v1",
        api_key_link: Some("https://console.anthropic.com/settings/keys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::Anthropic,
        listing: Some(ModelListing::Anthropic),
        static_models: &[
            model("claude-3-5-sonnet-latest", "Claude 3.5 Sonnet (new)", 8000),
            model("claude-3-5-sonnet-20240620", "Claude 3.5 Sonnet (old)", 8000),
            model("claude-3-5-haiku-latest", "Claude 3.5 Haiku (new)", 8000),
            model("claude-3-opus-latest", "Claude 3 Opus", 8000),
            model("claude-3-haiku-20240307", "Claude 3 Haiku", 8000),
        ],
    },
    ProviderSpec {
        name: "OpenAI",
        config: ProviderConfig {
            api_token_key: Some("OPENAI_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.openai.com/v1",
        api_key_link: Some("https://platform.openai.com/api-keys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[
            model("gpt-4o", "GPT-4o", 8000),
            model("gpt-4o-mini", "GPT-4o Mini", 8000),
            model("gpt-4-turbo", "GPT-4 Turbo", 8000),
            model("gpt-4", "GPT-4", 8000),
            model("gpt-3.5-turbo", "GPT-3.5 Turbo", 8000),
        ],
    },
    ProviderSpec {
        name: "Deepseek",
        config: ProviderConfig {
            api_token_key: Some("DEEPSEEK_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.deepseek.com/beta",
        api_key_link: Some("https://platform.deepseek.com/apiKeys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model("deepseek-coder", "Deepseek-Coder", 8000),
            model("deepseek-chat", "Deepseek-Chat", 8000),
            model("deepseek-reasoner", "Deepseek-Reasoner", 8000),
        ],
    },
    ProviderSpec {
        name: "Google",
        config: ProviderConfig {
            api_token_key: Some("GOOGLE_GENERATIVE_AI_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        api_key_link: Some("https://aistudio.google.com/app/apikey"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[
            model("gemini-1.5-flash-latest", "Gemini 1.5 Flash", 8192),
            model("gemini-1.5-pro-latest", "Gemini 1.5 Pro", 8192),
            model("gemini-2.0-flash-exp", "Gemini 2.0 Flash", 8192),
        ],
    },
    ProviderSpec {
        name: "Groq",
        config: ProviderConfig {
            api_token_key: Some("GROQ_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.groq.com/openai/v1",
        api_key_link: Some("https://console.groq.com/keys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[
            model("llama-3.1-8b-instant", "Llama 3.1 8b (Groq)", 8000),
            model("llama-3.2-11b-vision-preview", "Llama 3.2 11b (Groq)", 8000),
            model("llama-3.3-70b-versatile", "Llama 3.3 70b (Groq)", 8000),
        ],
    },
    ProviderSpec {
        name: "Mistral",
        config: ProviderConfig {
            api_token_key: Some("MISTRAL_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.mistral.ai/v1",
        api_key_link: Some("https://console.mistral.ai/api-keys/"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model("open-mistral-7b", "Mistral 7B", 8000),
            model("open-mixtral-8x7b", "Mistral 8x7B", 8000),
            model("codestral-latest", "Codestral", 8000),
            model("mistral-small-latest", "Mistral Small", 8000),
            model("mistral-large-latest", "Mistral Large Latest", 8000),
        ],
    },
    ProviderSpec {
        name: "OpenRouter",
        config: ProviderConfig {
            api_token_key: Some("OPEN_ROUTER_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://openrouter.ai/api/v1",
        api_key_link: Some("https://openrouter.ai/settings/keys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[
            model("anthropic/claude-3.5-sonnet", "Anthropic: Claude 3.5 Sonnet (OpenRouter)", 8000),
            model("google/gemini-flash-1.5", "Google Gemini Flash 1.5 (OpenRouter)", 8000),
            model("deepseek/deepseek-coder", "Deepseek-Coder V2 236B (OpenRouter)", 8000),
            model("mistralai/mistral-nemo", "OpenRouter Mistral Nemo (OpenRouter)", 8000),
        ],
    },
    ProviderSpec {
        name: "Together",
        config: ProviderConfig {
            api_token_key: Some("TOGETHER_API_KEY"),
            base_url_key: Some("TOGETHER_API_BASE_URL"),
        },
        default_base_url: "https://api.together.xyz/v1",
        api_key_link: Some("https://api.together.xyz/settings/api-keys"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::Together),
        static_models: &[
            model("Qwen/Qwen2.5-Coder-32B-Instruct", "Qwen/Qwen2.5-Coder-32B-Instruct", 8000),
            model(
                "meta-llama/Llama-3.2-90B-Vision-Instruct-Turbo",
                "meta-llama/Llama-3.2-90B-Vision-Instruct-Turbo",
                8000,
            ),
            model("mistralai/Mixtral-8x7B-Instruct-v0.1", "Mixtral 8x7B Instruct", 8192),
        ],
    },
    ProviderSpec {
        name: "Perplexity",
        config: ProviderConfig {
            api_token_key: Some("PERPLEXITY_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.perplexity.ai",
        api_key_link: Some("https://www.perplexity.ai/settings/api"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model("llama-3.1-sonar-small-128k-online", "Sonar Small Online", 8192),
            model("llama-3.1-sonar-large-128k-online", "Sonar Large Online", 8192),
            model("llama-3.1-sonar-huge-128k-online", "Sonar Huge Online", 8192),
        ],
    },
    ProviderSpec {
        name: "HuggingFace",
        config: ProviderConfig {
            api_token_key: Some("HuggingFace_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api-inference.huggingface.co/v1",
        api_key_link: Some("https://huggingface.co/settings/tokens"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model(
                "Qwen/Qwen2.5-Coder-32B-Instruct",
                "Qwen2.5-Coder-32B-Instruct (HuggingFace)",
                8000,
            ),
            model(
                "meta-llama/Llama-3.1-70B-Instruct",
                "Llama-3.1-70B-Instruct (HuggingFace)",
                8000,
            ),
        ],
    },
    ProviderSpec {
        name: "xAI",
        config: ProviderConfig {
            api_token_key: Some("XAI_API_KEY"),
            base_url_key: None,
        },
        default_base_url: "https://api.x.ai/v1",
        api_key_link: Some("https://docs.x.ai/docs/quickstart#creating-an-api-key"),
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model("grok-beta", "xAI Grok Beta", 8000),
            model("grok-vision-beta", "xAI Grok Vision Beta", 8000),
        ],
    },
    ProviderSpec {
        name: "Vertex",
        config: ProviderConfig {
            api_token_key: Some("GOOGLE_VERTEX_ACCESS_TOKEN"),
            base_url_key: Some("GOOGLE_VERTEX_API_BASE_URL"),
        },
        default_base_url: "https://{GOOGLE_VERTEX_LOCATION}-aiplatform.googleapis.com/v1beta1/projects/{GOOGLE_VERTEX_PROJECT}/locations/{GOOGLE_VERTEX_LOCATION}/endpoints/openapi",
        api_key_link: Some("https://console.cloud.google.com/vertex-ai"),
        label_for_get_api_key: Some("Open Vertex AI Console"),
        requires_api_key: true,
        extra_keys: &["GOOGLE_VERTEX_PROJECT", "GOOGLE_VERTEX_LOCATION"],
        wire: WireFormat::OpenAi,
        listing: None,
        static_models: &[
            model("google/gemini-1.5-pro-002", "Gemini 1.5 Pro (Vertex)", 8192),
            model("google/gemini-1.5-flash-002", "Gemini 1.5 Flash (Vertex)", 8192),
        ],
    },
    ProviderSpec {
        name: "Ollama",
        config: ProviderConfig {
            api_token_key: None,
            base_url_key: Some("OLLAMA_API_BASE_URL"),
        },
        default_base_url: "http://127.0.0.1:11434",
        api_key_link: Some("https://ollama.com/download"),
        label_for_get_api_key: Some("Download Ollama"),
        requires_api_key: false,
        extra_keys: &[],
        wire: WireFormat::Ollama,
        listing: Some(ModelListing::Ollama),
        static_models: &[],
    },
    ProviderSpec {
        name: "LMStudio",
        config: ProviderConfig {
            api_token_key: None,
            base_url_key: Some("LMSTUDIO_API_BASE_URL"),
        },
        default_base_url: "http://127.0.0.1:1234/v1",
        api_key_link: Some("https://lmstudio.ai/"),
        label_for_get_api_key: Some("Get LMStudio"),
        requires_api_key: false,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[],
    },
    ProviderSpec {
        name: "OpenAILike",
        config: ProviderConfig {
            api_token_key: Some("OPENAI_LIKE_API_KEY"),
            base_url_key: Some("OPENAI_LIKE_API_BASE_URL"),
        },
        default_base_url: "",
        api_key_link: None,
        label_for_get_api_key: None,
        requires_api_key: true,
        extra_keys: &[],
        wire: WireFormat::OpenAi,
        listing: Some(ModelListing::OpenAi),
        static_models: &[],
    },
];

/// Look up a built-in provider by name.
pub fn find_spec(name: &str) -> Option<&'static ProviderSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}
