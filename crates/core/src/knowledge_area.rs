//! Topic areas a work can be filed under.

define_code_enum! {
    /// Knowledge area of a work, serialized as its numeric code.
    KnowledgeArea ("knowledge area") {
        Administration = 0 => "Administration",
        HumanAspects = 1 => "Human Aspects",
        SoftwareDevelopment = 2 => "Software Development",
        ComputationMathematics = 3 => "Computation Mathematics",
        ComputationMethods = 4 => "Computation Methods",
        DataPersistence = 5 => "Data Persistence",
        Networks = 6 => "Networks",
        ComputationTheory = 7 => "Computation Theory",
    }
}

impl Default for KnowledgeArea {
    /// Code 0, the value an unset numeric field decodes to.
    fn default() -> Self {
        KnowledgeArea::Administration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_eight_areas() {
        assert_eq!(KnowledgeArea::ALL.len(), 8);
    }

    #[test]
    fn decodes_from_code() {
        assert_eq!(KnowledgeArea::try_from(2).unwrap(), KnowledgeArea::SoftwareDevelopment);
        assert_eq!(KnowledgeArea::Networks.id(), 6);
    }

    #[test]
    fn out_of_range_code_rejected() {
        let err = KnowledgeArea::try_from(8).unwrap_err();
        assert!(err.to_string().contains("knowledge area code 8"));
    }

    #[test]
    fn travels_as_number() {
        let json = serde_json::to_string(&KnowledgeArea::DataPersistence).unwrap();
        assert_eq!(json, "5");
        assert!(serde_json::from_str::<KnowledgeArea>("9").is_err());
    }
}
