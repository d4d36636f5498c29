use rapier2d::prelude::*;

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The playable character's capsule
    Character = 0b0000_0010,

    /// Static level geometry (floors, ledges, walls)
    Platform = 0b0000_0100,
}

impl CollisionGroups {
    /// Membership bits of this group
    pub fn bits(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // Characters stand on platforms but pass through each other
            CollisionGroups::Character => CollisionGroups::Platform.bits(),

            CollisionGroups::Platform => {
                CollisionGroups::Character.bits() | CollisionGroups::Default.bits()
            }

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(self.bits(), filter)
    }

    /// Query filter for ray casts that should only see level geometry
    pub fn ground_query_filter() -> QueryFilter<'static> {
        QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(
                Group::ALL,
                CollisionGroups::Platform.bits(),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_groups_bits_unique() {
        let groups = [
            CollisionGroups::Default,
            CollisionGroups::Character,
            CollisionGroups::Platform,
        ];

        for (i, group1) in groups.iter().enumerate() {
            for (j, group2) in groups.iter().enumerate() {
                if i != j {
                    assert_ne!(*group1 as u32, *group2 as u32);
                }
            }
        }
    }

    #[test]
    fn test_character_ignores_other_characters() {
        let groups = CollisionGroups::Character.to_interaction_groups();
        assert!(!groups.filter.contains(groups.memberships));
    }

    #[test]
    fn test_character_and_platform_interact() {
        let character = CollisionGroups::Character.to_interaction_groups();
        let platform = CollisionGroups::Platform.to_interaction_groups();
        assert!(character.test(platform));
    }
}
