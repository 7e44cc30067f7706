use super::error::SystemConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemConfigKey {
    MachineLearningEnabled,
    MachineLearningUrl,
    ClassificationEnabled,
    ClassificationMinScore,
    ClassificationModelName,
    ClipEnabled,
    ClipModelName,
}

impl SystemConfigKey {
    pub const ALL: [Self; 7] = [
        Self::MachineLearningEnabled,
        Self::MachineLearningUrl,
        Self::ClassificationEnabled,
        Self::ClassificationMinScore,
        Self::ClassificationModelName,
        Self::ClipEnabled,
        Self::ClipModelName,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MachineLearningEnabled => "machineLearning.enabled",
            Self::MachineLearningUrl => "machineLearning.url",
            Self::ClassificationEnabled => "machineLearning.classification.enabled",
            Self::ClassificationMinScore => "machineLearning.classification.minScore",
            Self::ClassificationModelName => "machineLearning.classification.modelName",
            Self::ClipEnabled => "machineLearning.clip.enabled",
            Self::ClipModelName => "machineLearning.clip.modelName",
        }
    }
}

impl std::fmt::Display for SystemConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SystemConfigKey {
    type Err = SystemConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SystemConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_from_their_display_form() {
        for key in SystemConfigKey::ALL {
            assert_eq!(key.to_string().parse::<SystemConfigKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "machineLearning.facialRecognition.enabled"
            .parse::<SystemConfigKey>()
            .unwrap_err();
        assert!(matches!(err, SystemConfigError::UnknownKey(_)));
    }
}
