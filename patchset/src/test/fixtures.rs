/// A WIP change with three patch sets and an edit based on patch set 2.
pub const CHANGE_WITH_EDIT: &str = r#"{
  "id": "demo~master~I8473b95934b5732ac55d26311a706c9c2bde9940",
  "project": "demo",
  "_number": 4711,
  "status": "NEW",
  "work_in_progress": true,
  "revisions": {
    "a100000000000000000000000000000000000000": {
      "_number": 1,
      "description": "Initial upload"
    },
    "b200000000000000000000000000000000000000": {
      "_number": 2,
      "description": "Address comments"
    },
    "c300000000000000000000000000000000000000": {
      "_number": 3
    },
    "ed17000000000000000000000000000000000000": {
      "_number": "edit",
      "basePatchNum": 2
    }
  },
  "messages": [
    {
      "tag": "autogenerated:gerrit:newWipPatchSet",
      "_revision_number": 1,
      "message": "Uploaded patch set 1."
    },
    {
      "tag": "autogenerated:gerrit:setReadyForReview",
      "_revision_number": 2,
      "message": "Set Ready For Review"
    },
    {
      "tag": "autogenerated:gerrit:setWorkInProgress",
      "_revision_number": 3,
      "message": "Set Work In Progress"
    }
  ]
}"#;
