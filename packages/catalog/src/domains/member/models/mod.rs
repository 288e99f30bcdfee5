mod member;

pub use member::FamilyMember;
