// Aliyun Resource Adapter for Rust
// Copyright 2026 the aliyun-adapter authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Machine images.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CloudResource, ImageOwner, ImageStatus};
use crate::aliyun::utils;

/// An image as `DescribeImages` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Image {
    pub image_id: String,
    pub image_name: String,
    /// Vendor status string; see [`Image::state`].
    pub status: String,
    pub image_owner_alias: String,
    #[serde(rename = "OSType")]
    pub os_type: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    pub architecture: String,
    pub platform: String,
    /// GiB; doubles as the minimum system disk size for this image.
    pub size: u32,
    pub progress: String,
    pub is_public: bool,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub creation_time: Option<DateTime<Utc>>,
}

impl Image {
    pub fn state(&self) -> ImageStatus {
        ImageStatus::from_vendor(&self.status)
    }

    pub fn owner(&self) -> ImageOwner {
        ImageOwner::from_vendor(&self.image_owner_alias)
    }

    /// Minimum system disk size when provisioning from this image.
    pub fn size_gb(&self) -> u32 {
        self.size
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.image(&self.image_id).await?;
        Ok(())
    }
}

impl CloudResource for Image {
    fn id(&self) -> &str {
        &self.image_id
    }

    fn name(&self) -> String {
        if self.image_name.is_empty() {
            self.image_id.clone()
        } else {
            self.image_name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.image_id.clone()
    }

    fn status(&self) -> &'static str {
        self.state().as_str()
    }
}

impl Region {
    /// Images visible in the region, optionally restricted to one owner
    /// class and/or an id list (CSV filter on this endpoint).
    pub async fn images(&self, owner: Option<ImageOwner>, ids: &[&str]) -> Result<Vec<Image>> {
        paging::collect_indexed(50, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.opt("ImageOwnerAlias", owner.map(|o| o.vendor_alias()));
            p.set_csv("ImageId", ids);
            let doc = self.ecs("DescribeImages", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Images", "Image"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing images in {}", self.id())))
    }

    pub async fn image(&self, image_id: &str) -> Result<Image> {
        self.images(None, &[image_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("image {image_id}")))
    }

    pub async fn delete_image(&self, image_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("ImageId", image_id);
        match self.ecs("DeleteImage", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_and_owner_getters() {
        let image = Image {
            image_id: "m-1".into(),
            status: "Available".into(),
            image_owner_alias: "marketplace".into(),
            size: 40,
            ..Default::default()
        };
        assert_eq!(image.state(), ImageStatus::Active);
        assert_eq!(image.status(), "active");
        assert_eq!(image.owner(), ImageOwner::Market);
        assert_eq!(image.size_gb(), 40);
    }
}
