use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::RigError;

/// One line of the bone table: a mesh bone and the humanoid role it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneRecord {
    pub bone_name: String,
    pub human_name: String,
}

/// Immutable mapping from mesh bone names to humanoid roles.
///
/// Built once from the `bone,role` table and read-only afterwards, so it can be
/// shared between concurrent skeleton builds.
#[derive(Debug, Clone, Default)]
pub struct BoneRoleTable {
    records: Vec<BoneRecord>,
    by_bone: HashMap<String, usize>,
}

impl BoneRoleTable {
    /// Parse the comma separated table. Lines are CRLF delimited (bare LF is
    /// accepted too), blank lines are skipped, fields are trimmed.
    pub fn parse(text: &str) -> Result<Self, RigError> {
        let mut records = Vec::new();
        let mut by_bone = HashMap::new();
        let mut by_role: HashMap<String, String> = HashMap::new();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let Some((bone, role)) = line.split_once(',') else {
                return Err(RigError::MalformedTable {
                    line: i + 1,
                    content: line.to_string(),
                });
            };
            let (bone, role) = (bone.trim(), role.trim());
            if bone.is_empty() || role.is_empty() || role.contains(',') {
                return Err(RigError::MalformedTable {
                    line: i + 1,
                    content: line.to_string(),
                });
            }

            if by_bone.contains_key(bone) {
                return Err(RigError::AmbiguousMapping(format!(
                    "bone '{}' is listed more than once (line {})",
                    bone,
                    i + 1
                )));
            }
            if let Some(other) = by_role.get(role) {
                return Err(RigError::AmbiguousMapping(format!(
                    "role '{}' is claimed by both '{}' and '{}'",
                    role, other, bone
                )));
            }

            by_role.insert(role.to_string(), bone.to_string());
            by_bone.insert(bone.to_string(), records.len());
            records.push(BoneRecord {
                bone_name: bone.to_string(),
                human_name: role.to_string(),
            });
        }

        Ok(Self { records, by_bone })
    }

    /// Read and parse a bone table file.
    pub fn load(path: &Path) -> Result<Self, RigError> {
        if !path.exists() {
            return Err(RigError::MissingResource(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| RigError::Io(path.to_path_buf(), e))?;
        let table = Self::parse(&text)?;
        info!("Loaded {} bone roles from {:?}", table.len(), path);
        Ok(table)
    }

    /// Humanoid role for a mesh bone, if the table assigns one.
    pub fn role_for(&self, bone_name: &str) -> Option<&str> {
        self.by_bone
            .get(bone_name)
            .map(|&i| self.records[i].human_name.as_str())
    }

    pub fn records(&self) -> &[BoneRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_crlf_table() {
        let table = BoneRoleTable::parse("Hips,Hips\r\nL_Ankle,LeftFoot\r\n\r\nHead,Head\r\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.role_for("L_Ankle"), Some("LeftFoot"));
        assert_eq!(table.role_for("Spine"), None);
        assert_eq!(table.records()[2].bone_name, "Head");
    }

    #[test]
    fn accepts_lf_and_trims_fields() {
        let table = BoneRoleTable::parse("Hips , Hips\nHead,Head").unwrap();
        assert_eq!(table.role_for("Hips"), Some("Hips"));
    }

    #[test]
    fn line_without_comma_is_malformed() {
        let err = BoneRoleTable::parse("Hips,Hips\r\nHead\r\n").unwrap_err();
        assert!(matches!(err, RigError::MalformedTable { line: 2, .. }));
    }

    #[test]
    fn duplicate_bone_is_ambiguous() {
        let err = BoneRoleTable::parse("Hips,Hips\r\nHips,Spine\r\n").unwrap_err();
        assert!(matches!(err, RigError::AmbiguousMapping(_)));
    }

    #[test]
    fn duplicate_role_is_ambiguous() {
        let err = BoneRoleTable::parse("Hips,Hips\r\nPelvis,Hips\r\n").unwrap_err();
        assert!(matches!(err, RigError::AmbiguousMapping(_)));
    }

    #[test]
    fn missing_file_is_missing_resource() {
        let err = BoneRoleTable::load(Path::new("/nonexistent/human_bones.txt")).unwrap_err();
        assert!(matches!(err, RigError::MissingResource(_)));
    }
}
