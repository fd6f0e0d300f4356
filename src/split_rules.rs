use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use log::debug;
use serde::Deserialize;

use crate::{
    display_set::DisplaySetError,
    instance::Instance,
    metadata::{Attribute, UnknownAttribute},
};

pub type Selector = Arc<dyn Fn(&Instance) -> bool + Send + Sync>;
pub type KeyFn = Arc<dyn Fn(&Instance) -> String + Send + Sync>;

/// One component of a split key.
#[derive(Clone)]
pub enum SplitKey {
    Attribute(Attribute),
    Custom(KeyFn),
}

impl SplitKey {
    pub fn custom(key: impl Fn(&Instance) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(key))
    }

    fn evaluate(&self, instance: &Instance) -> String {
        match self {
            Self::Attribute(attribute) => instance
                .attribute(*attribute)
                .map(|value| value.to_string())
                .unwrap_or_default(),
            Self::Custom(key) => key(instance),
        }
    }
}

impl fmt::Debug for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(attribute) => write!(f, "Attribute({})", attribute.keyword()),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Attribute> for SplitKey {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

/// Describes which instances a rule applies to and how they are grouped.
#[derive(Clone)]
pub struct SplitRule {
    pub id: String,
    selector: Option<Selector>,
    split_key: Vec<SplitKey>,
}

impl fmt::Debug for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitRule")
            .field("id", &self.id)
            .field("selector", &self.selector.as_ref().map(|_| ".."))
            .field("split_key", &self.split_key)
            .finish()
    }
}

impl SplitRule {
    pub fn new(id: impl Into<String>, split_key: Vec<SplitKey>) -> Self {
        Self {
            id: id.into(),
            selector: None,
            split_key,
        }
    }

    pub fn by_attributes(id: impl Into<String>, attributes: &[Attribute]) -> Self {
        Self::new(id, attributes.iter().copied().map(SplitKey::from).collect())
    }

    pub fn with_selector(
        self,
        selector: impl Fn(&Instance) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            selector: Some(Arc::new(selector)),
            ..self
        }
    }

    /// Groups every instance by SeriesInstanceUID.
    pub fn series() -> Self {
        Self::by_attributes("series", &[Attribute::SeriesInstanceUid])
    }

    /// The stock stack rules: every non-image object, every multi-frame
    /// object and every image of a single-image modality becomes its own
    /// group, everything else is stacked per series.
    pub fn default_rules(single_image_modalities: &[String]) -> Vec<Self> {
        let single_image_modalities = single_image_modalities.to_vec();
        let per_instance = || {
            vec![
                SplitKey::Attribute(Attribute::SeriesInstanceUid),
                SplitKey::custom(|instance| instance.image_id.clone()),
            ]
        };

        vec![
            Self::new("non-image", per_instance()).with_selector(|instance| !instance.is_image()),
            Self::new("multiframe", per_instance()).with_selector(Instance::is_multi_frame),
            Self::new("single-image-modality", per_instance()).with_selector(move |instance| {
                instance
                    .modality
                    .as_ref()
                    .is_some_and(|modality| single_image_modalities.contains(modality))
            }),
            Self::series(),
        ]
    }

    pub fn matches(&self, instance: &Instance) -> bool {
        self.selector
            .as_ref()
            .is_none_or(|selector| selector(instance))
    }

    /// Composite group key of `instance` under this rule.
    ///
    /// Parts are joined with `&`; a `\` or `&` inside a part is escaped with
    /// a backslash, so distinct value tuples never share a key.
    pub fn key(&self, instance: &Instance) -> String {
        let parts: Vec<String> = self
            .split_key
            .iter()
            .map(|key| escape_key_part(&key.evaluate(instance)))
            .collect();
        format!("{}:{}", self.id, parts.join("&"))
    }
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | '&') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Declarative split rule as written in a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitRuleConfig {
    pub id: String,
    /// Keywords whose values form the group key; SeriesInstanceUID if empty.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Keyword to value pairs an instance must all match.
    #[serde(default)]
    pub matches: BTreeMap<String, String>,
    #[serde(default)]
    pub multi_frame: Option<bool>,
}

impl TryFrom<&SplitRuleConfig> for SplitRule {
    type Error = UnknownAttribute;

    fn try_from(config: &SplitRuleConfig) -> Result<Self, Self::Error> {
        let mut attributes = config
            .attributes
            .iter()
            .map(|keyword| keyword.parse::<Attribute>())
            .collect::<Result<Vec<_>, _>>()?;
        if attributes.is_empty() {
            attributes.push(Attribute::SeriesInstanceUid);
        }

        let matches = config
            .matches
            .iter()
            .map(|(keyword, value)| {
                Ok::<_, UnknownAttribute>((keyword.parse::<Attribute>()?, value.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rule = Self::by_attributes(config.id.clone(), &attributes);
        if matches.is_empty() && config.multi_frame.is_none() {
            return Ok(rule);
        }

        let multi_frame = config.multi_frame;
        Ok(rule.with_selector(move |instance| {
            multi_frame.is_none_or(|expected| instance.is_multi_frame() == expected)
                && matches.iter().all(|(attribute, expected)| {
                    instance
                        .attribute(*attribute)
                        .is_some_and(|value| value.to_string() == *expected)
                })
        }))
    }
}

/// Instances that ended up under the same split key.
#[derive(Debug, Clone)]
pub struct SplitGroup {
    pub key: String,
    pub rule_id: String,
    pub instances: Vec<Arc<Instance>>,
}

/// Partition `instances` with the first matching rule per instance
///
/// Groups come back in the order their first instance appears and keep the
/// input order of their instances. Without rules, or when no rule accepts an
/// instance, instances are grouped by SeriesInstanceUID.
///
/// # Errors
///
/// Returns [`DisplaySetError::NoInstances`] for an empty instance list.
pub fn split_instances(
    instances: &[Arc<Instance>],
    rules: &[SplitRule],
) -> Result<Vec<SplitGroup>, DisplaySetError> {
    if instances.is_empty() {
        return Err(DisplaySetError::NoInstances);
    }

    let fallback = SplitRule::series();
    let mut groups: Vec<SplitGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for instance in instances {
        let rule = rules
            .iter()
            .find(|rule| rule.matches(instance))
            .unwrap_or(&fallback);
        let key = rule.key(instance);

        match index_by_key.get(&key) {
            Some(&index) => groups[index].instances.push(Arc::clone(instance)),
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(SplitGroup {
                    key,
                    rule_id: rule.id.clone(),
                    instances: vec![Arc::clone(instance)],
                });
            }
        }
    }

    for group in &groups {
        debug!("split group {} holds {} instances", group.key, group.instances.len());
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(id: &str, series: &str, modality: &str, frames: Option<u32>) -> Arc<Instance> {
        Arc::new(Instance {
            series_instance_uid: Some(series.into()),
            modality: Some(modality.into()),
            number_of_frames: frames,
            rows: Some(64),
            ..Instance::new(id)
        })
    }

    fn group_ids(groups: &[SplitGroup]) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|g| g.instances.iter().map(|i| i.image_id.as_str()).collect())
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = split_instances(&[], &[]).unwrap_err();
        assert_eq!(err.to_string(), "No instances were provided");
    }

    #[test]
    fn no_rules_group_by_series() {
        let instances = [
            instance("a1", "A", "CT", None),
            instance("b1", "B", "CT", None),
            instance("a2", "A", "CT", None),
        ];
        let groups = split_instances(&instances, &[]).unwrap();
        assert_eq!(group_ids(&groups), [vec!["a1", "a2"], vec!["b1"]]);
        assert_eq!(groups[0].key, "series:A");
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = [
            SplitRule::by_attributes("ct", &[Attribute::Modality])
                .with_selector(|i| i.modality.as_deref() == Some("CT")),
            SplitRule::by_attributes("everything", &[Attribute::Modality]),
        ];
        let instances = [
            instance("ct", "A", "CT", None),
            instance("mr", "A", "MR", None),
        ];
        let groups = split_instances(&instances, &rules).unwrap();
        assert_eq!(groups[0].rule_id, "ct");
        assert_eq!(groups[1].rule_id, "everything");
    }

    #[test]
    fn unmatched_instances_fall_back_to_series() {
        let rules = [SplitRule::series().with_selector(|_| false)];
        let groups = split_instances(&[instance("a", "A", "CT", None)], &rules).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "series:A");
    }

    #[test]
    fn default_rules_separate_multiframe_and_single_image_modalities() {
        let rules = SplitRule::default_rules(&["CR".to_string()]);
        let presentation_state = Arc::new(Instance {
            sop_class_uid: Some("1.2.840.10008.5.1.4.1.1.11.1".into()),
            series_instance_uid: Some("A".into()),
            modality: Some("PR".into()),
            ..Instance::new("gsps")
        });
        let instances = [
            instance("ct1", "A", "CT", Some(1)),
            instance("cine", "A", "CT", Some(30)),
            presentation_state,
            instance("ct2", "A", "CT", None),
            instance("cr1", "B", "CR", None),
            instance("cr2", "B", "CR", None),
        ];
        let groups = split_instances(&instances, &rules).unwrap();
        assert_eq!(
            group_ids(&groups),
            [
                vec!["ct1", "ct2"],
                vec!["cine"],
                vec!["gsps"],
                vec!["cr1"],
                vec!["cr2"]
            ]
        );
        assert_eq!(groups[2].rule_id, "non-image");
    }

    #[test]
    fn separators_inside_values_do_not_merge_groups() {
        let rules = [SplitRule::by_attributes(
            "r",
            &[Attribute::SeriesDescription, Attribute::SeriesDate],
        )];
        let described = |id: &str, description: &str, date: &str| {
            Arc::new(Instance {
                series_description: Some(description.into()),
                series_date: Some(date.into()),
                ..Instance::new(id)
            })
        };

        let ampersands = [described("a", "A&B", "C"), described("b", "A", "B&C")];
        let groups = split_instances(&ampersands, &rules).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, r"r:A\&B&C");
        assert_eq!(groups[1].key, r"r:A&B\&C");

        let backslashes = [described("c", r"A\", "B"), described("d", "A", r"\B")];
        assert_eq!(split_instances(&backslashes, &rules).unwrap().len(), 2);
    }

    #[test]
    fn configured_rule_filters_and_keys() {
        let config = SplitRuleConfig {
            id: "echo".into(),
            attributes: vec!["SeriesInstanceUID".into(), "SeriesNumber".into()],
            matches: BTreeMap::from([("Modality".to_string(), "MR".to_string())]),
            multi_frame: Some(false),
        };
        let rule = SplitRule::try_from(&config).unwrap();

        let mr = Instance {
            series_number: Some(3),
            ..(*instance("mr", "S", "MR", None)).clone()
        };
        assert!(rule.matches(&mr));
        assert_eq!(rule.key(&mr), "echo:S&3");
        assert!(!rule.matches(&instance("ct", "S", "CT", None)));
        assert!(!rule.matches(&instance("cine", "S", "MR", Some(12))));
    }
}
