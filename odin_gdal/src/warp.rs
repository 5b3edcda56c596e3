/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! cutline warping through the GDALWarp application API, with the equivalent `gdalwarp` command line
//! as an alternative execution path

use std::{ffi::{CString, c_int}, path::{Path, PathBuf}, process::Command, ptr::null_mut};
use tracing::{debug, warn};

use crate::{Dataset, DriverManager, CslStringList, get_driver_name_from_filename, to_csl_string_list};
use crate::errors::{Result, OdinGdalError, last_gdal_error, warp_error, command_error};

/// owned GDALWarpAppOptions handle
struct WarpAppOptions {
    options: *mut gdal_sys::GDALWarpAppOptions,
}

impl WarpAppOptions {
    fn new (args: &CslStringList) -> Result<Self> {
        let options = unsafe { gdal_sys::GDALWarpAppOptionsNew( args.as_ptr(), null_mut()) };
        if options.is_null() {
            Err( last_gdal_error())
        } else {
            Ok( WarpAppOptions { options } )
        }
    }
}

impl Drop for WarpAppOptions {
    fn drop (&mut self) {
        unsafe { gdal_sys::GDALWarpAppOptionsFree( self.options) }
    }
}

/// builder for a single source warp that clips the source to a (vector) cutline file
#[derive(Debug,Clone)]
pub struct CutlineWarpBuilder {
    src_path: PathBuf,
    tgt_path: PathBuf,
    tgt_format: String,
    cutline: Option<PathBuf>,
    crop_to_cutline: bool,
    create_options: Vec<(String,String)>,
    warp_options: Vec<(String,String)>,
    multithread: bool,
    dst_alpha: bool,
    overwrite: bool,
    warp_memory: Option<String>,
}

impl CutlineWarpBuilder {
    pub fn new (src_path: impl AsRef<Path>, tgt_path: impl AsRef<Path>) -> Self {
        let tgt_format = get_driver_name_from_filename( tgt_path.as_ref()).unwrap_or("GTiff").to_string();

        CutlineWarpBuilder {
            src_path: src_path.as_ref().to_path_buf(),
            tgt_path: tgt_path.as_ref().to_path_buf(),
            tgt_format,
            cutline: None,
            crop_to_cutline: false,
            create_options: Vec::new(),
            warp_options: Vec::new(),
            multithread: false,
            dst_alpha: false,
            overwrite: false,
            warp_memory: None,
        }
    }

    pub fn src_path (&self) -> &Path { &self.src_path }
    pub fn tgt_path (&self) -> &Path { &self.tgt_path }

    pub fn set_tgt_format (&mut self, tgt_format: &str) -> Result<&mut Self> {
        DriverManager::get_driver_by_name( tgt_format)?;
        self.tgt_format = tgt_format.to_string();
        Ok(self)
    }

    pub fn set_cutline (&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.cutline = Some( path.as_ref().to_path_buf());
        self
    }

    pub fn set_crop_to_cutline (&mut self, crop: bool) -> &mut Self {
        self.crop_to_cutline = crop;
        self
    }

    /// driver specific creation option ("-co")
    pub fn add_create_option (&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.create_options.push( (key.to_string(), value.to_string()));
        self
    }

    /// warp algorithm option ("-wo")
    pub fn add_warp_option (&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.warp_options.push( (key.to_string(), value.to_string()));
        self
    }

    pub fn set_multithread (&mut self, multithread: bool) -> &mut Self {
        self.multithread = multithread;
        self
    }

    /// add an alpha band to the output that marks pixels outside the cutline as transparent
    pub fn set_dst_alpha (&mut self, dst_alpha: bool) -> &mut Self {
        self.dst_alpha = dst_alpha;
        self
    }

    pub fn set_overwrite (&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    /// cache size for warping, either in MB or as percentage of usable RAM (e.g. "25%")
    pub fn set_warp_memory (&mut self, warp_memory: Option<String>) -> &mut Self {
        self.warp_memory = warp_memory;
        self
    }

    /// the gdalwarp switches without source and target
    pub fn app_args (&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        if self.overwrite { args.push( "-overwrite".into()) }
        if self.multithread { args.push( "-multi".into()) }
        if let Some(wm) = &self.warp_memory {
            args.push( "-wm".into());
            args.push( wm.clone());
        }

        args.push( "-of".into());
        args.push( self.tgt_format.clone());

        if let Some(cutline) = &self.cutline {
            args.push( "-cutline".into());
            args.push( cutline.to_string_lossy().to_string());
            if self.crop_to_cutline { args.push( "-crop_to_cutline".into()) }
        }

        if self.dst_alpha { args.push( "-dstalpha".into()) }

        for (k,v) in &self.create_options {
            args.push( "-co".into());
            args.push( format!("{k}={v}"));
        }
        for (k,v) in &self.warp_options {
            args.push( "-wo".into());
            args.push( format!("{k}={v}"));
        }

        args
    }

    /// the complete argument list for the `gdalwarp` executable
    pub fn cli_args (&self) -> Vec<String> {
        let mut args = self.app_args();
        args.push( self.src_path.to_string_lossy().to_string());
        args.push( self.tgt_path.to_string_lossy().to_string());
        args
    }

    /// run the warp in-process. The target dataset is closed (and hence flushed) before we return
    pub fn exec (&self) -> Result<()> {
        let src_ds = Dataset::open( &self.src_path)?;
        let args = to_csl_string_list( &self.app_args())?;
        let opts = WarpAppOptions::new( &args)?;
        let c_tgt_path = CString::new( self.tgt_path.to_string_lossy().as_ref())?;

        debug!("warping {:?} -> {:?}", self.src_path, self.tgt_path);

        let mut h_src = unsafe { src_ds.c_dataset() };
        let mut usage_error: c_int = 0;
        let h_tgt = unsafe {
            gdal_sys::GDALWarp( c_tgt_path.as_ptr(), null_mut(), 1, &mut h_src, opts.options, &mut usage_error)
        };

        if h_tgt.is_null() {
            let err = last_gdal_error();
            return if usage_error != 0 { Err( warp_error( format!("invalid warp options: {err}"))) } else { Err(err) }
        }

        // wrapping the handle makes sure GDALClose is called
        let tgt_ds = unsafe { Dataset::from_c_dataset( h_tgt) };
        drop( tgt_ds);
        Ok(())
    }

    /// run the warp through an external `gdalwarp` executable
    pub fn exec_cli (&self, cmd: &str) -> Result<()> {
        let args = self.cli_args();
        debug!("running {} {}", cmd, args.join(" "));

        let output = Command::new( cmd).args( &args).output()
            .map_err( |e| command_error( format!("failed to run {cmd}: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy( &output.stderr);
            warn!("{} failed with {}", cmd, output.status);
            Err( command_error( format!("{cmd} exited with {}: {}", output.status, stderr.trim())))
        }
    }
}
